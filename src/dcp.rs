//! Curvature tracking for DCP (Disciplined Convex Programming).
//!
//! Determines whether a scalar expression is convex, concave, affine, or unknown.

/// Curvature of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curvature {
    /// Constant value (most restrictive).
    Constant,
    /// Affine function (both convex and concave).
    Affine,
    /// Convex function.
    Convex,
    /// Concave function.
    Concave,
    /// Unknown curvature (not DCP-compliant).
    Unknown,
}

impl Curvature {
    /// Constant, affine, or convex.
    pub fn is_convex(self) -> bool {
        matches!(self, Curvature::Constant | Curvature::Affine | Curvature::Convex)
    }

    /// Constant, affine, or concave.
    pub fn is_concave(self) -> bool {
        matches!(self, Curvature::Constant | Curvature::Affine | Curvature::Concave)
    }

    /// Constant or affine.
    pub fn is_affine(self) -> bool {
        matches!(self, Curvature::Constant | Curvature::Affine)
    }

    /// Negate the curvature (convex <-> concave).
    pub fn negate(self) -> Self {
        match self {
            Curvature::Convex => Curvature::Concave,
            Curvature::Concave => Curvature::Convex,
            other => other,
        }
    }
}

/// Combine curvatures for addition: a + b.
pub fn add_curvature(a: Curvature, b: Curvature) -> Curvature {
    use Curvature::*;
    match (a, b) {
        (Unknown, _) | (_, Unknown) => Unknown,
        (Constant, x) | (x, Constant) => x,
        (Affine, x) | (x, Affine) => x,
        (Convex, Convex) => Convex,
        (Concave, Concave) => Concave,
        (Convex, Concave) | (Concave, Convex) => Unknown,
    }
}

/// Combine curvatures for scalar multiplication: k * expr.
///
/// Non-negative k preserves curvature, negative k flips it, zero yields a constant.
pub fn scale_curvature(k: f64, c: Curvature) -> Curvature {
    if !k.is_finite() {
        Curvature::Unknown
    } else if k == 0.0 {
        Curvature::Constant
    } else if k > 0.0 {
        c
    } else {
        c.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Curvature::*;

    #[test]
    fn test_add_rules() {
        assert_eq!(add_curvature(Constant, Convex), Convex);
        assert_eq!(add_curvature(Affine, Convex), Convex);
        assert_eq!(add_curvature(Convex, Convex), Convex);
        assert_eq!(add_curvature(Convex, Concave), Unknown);
        assert_eq!(add_curvature(Unknown, Constant), Unknown);
    }

    #[test]
    fn test_scale_rules() {
        assert_eq!(scale_curvature(0.05, Convex), Convex);
        assert_eq!(scale_curvature(-1.0, Convex), Concave);
        assert_eq!(scale_curvature(0.0, Convex), Constant);
        assert_eq!(scale_curvature(f64::NAN, Affine), Unknown);
    }

    #[test]
    fn test_predicates() {
        assert!(Affine.is_convex() && Affine.is_concave());
        assert!(!Convex.is_concave());
        assert!(!Unknown.is_convex());
    }
}
