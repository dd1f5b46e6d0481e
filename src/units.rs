use derive_more::{Add, AddAssign, Display, From, Into, Sub, Sum};

/// A length in CSS pixels. All widths, heights, and coordinates produced by this
/// crate are in the same pixel space as the measurement callback that fed them.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, AddAssign, Sub, Sum, From, Into,
    Display,
)]
pub struct Px(pub f64);

impl Px {
    pub const ZERO: Px = Px(0.0);

    pub fn abs(self) -> Px {
        Px(self.0.abs())
    }

    pub fn max(self, other: Px) -> Px {
        Px(self.0.max(other.0))
    }

    pub fn min(self, other: Px) -> Px {
        Px(self.0.min(other.0))
    }
}

impl std::ops::Mul<f64> for Px {
    type Output = Px;

    fn mul(self, rhs: f64) -> Px {
        Px(self.0 * rhs)
    }
}

impl std::ops::Div<f64> for Px {
    type Output = Px;

    fn div(self, rhs: f64) -> Px {
        Px(self.0 / rhs)
    }
}

/// Dividing two lengths yields a dimensionless ratio.
impl std::ops::Div<Px> for Px {
    type Output = f64;

    fn div(self, rhs: Px) -> f64 {
        self.0 / rhs.0
    }
}

impl std::ops::Neg for Px {
    type Output = Px;

    fn neg(self) -> Px {
        Px(-self.0)
    }
}
