use std::{fmt::Display, ops};

use ordered_float::OrderedFloat;

use crate::interpreter::value::core::format_numeric;

/// A complex number `re + im·i`, the language's `imaginary` scalar.
#[derive(Debug, Clone, Copy)]
pub struct Imaginary {
    /// Real component.
    pub re: f64,
    /// Imaginary component.
    pub im: f64,
}

impl Display for Imaginary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.im.is_sign_negative() { '-' } else { '+' };
        write!(f,
               "{}{sign}{}i",
               format_numeric(self.re),
               format_numeric(self.im.abs()))
    }
}

impl Imaginary {
    /// Builds an imaginary value from its components.
    ///
    /// # Example
    /// ```
    /// use bloc::interpreter::value::imaginary::Imaginary;
    ///
    /// let z = Imaginary::new(2.0, -3.0);
    /// assert_eq!(z.to_string(), "2.0-3.0i");
    /// ```
    #[must_use]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Magnitude `|z|`.
    ///
    /// # Example
    /// ```
    /// use bloc::interpreter::value::imaginary::Imaginary;
    ///
    /// assert_eq!(Imaginary::new(3.0, 4.0).norm(), 5.0);
    /// ```
    #[must_use]
    pub fn norm(self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Phase angle in radians.
    #[must_use]
    pub fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    /// True for `0+0i`.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }

    /// Principal square root.
    ///
    /// # Example
    /// ```
    /// use bloc::interpreter::value::imaginary::Imaginary;
    ///
    /// let root = Imaginary::new(-4.0, 0.0).sqrt();
    /// assert!(root.re.abs() < 1e-12);
    /// assert!((root.im - 2.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn sqrt(self) -> Self {
        let r = self.norm();
        Self { re: f64::midpoint(r, self.re).sqrt(),
               im: ((r - self.re) / 2.0).sqrt().copysign(self.im), }
    }

    /// `e^z`
    #[must_use]
    pub fn exp(self) -> Self {
        let scale = self.re.exp();
        Self { re: scale * self.im.cos(),
               im: scale * self.im.sin(), }
    }

    /// Principal natural logarithm.
    #[must_use]
    pub fn ln(self) -> Self {
        Self { re: self.norm().ln(),
               im: self.arg(), }
    }

    /// Principal base-10 logarithm.
    #[must_use]
    pub fn log10(self) -> Self {
        let ln = self.ln();
        Self { re: ln.re / std::f64::consts::LN_10,
               im: ln.im / std::f64::consts::LN_10, }
    }

    /// `z^w` on the principal branch, `exp(w · ln z)`.
    ///
    /// The caller handles a zero base.
    ///
    /// # Example
    /// ```
    /// use bloc::interpreter::value::imaginary::Imaginary;
    ///
    /// let z = Imaginary::new(0.0, 1.0).powc(Imaginary::new(2.0, 0.0));
    /// assert!((z.re + 1.0).abs() < 1e-12);
    /// assert!(z.im.abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn powc(self, exponent: Self) -> Self {
        (exponent * self.ln()).exp()
    }

    /// Sine.
    #[must_use]
    pub fn sin(self) -> Self {
        Self { re: self.re.sin() * self.im.cosh(),
               im: self.re.cos() * self.im.sinh(), }
    }

    /// Cosine.
    #[must_use]
    pub fn cos(self) -> Self {
        Self { re: self.re.cos() * self.im.cosh(),
               im: -(self.re.sin() * self.im.sinh()), }
    }

    /// Tangent.
    #[must_use]
    pub fn tan(self) -> Self {
        self.sin() / self.cos()
    }

    /// Hyperbolic sine.
    #[must_use]
    pub fn sinh(self) -> Self {
        Self { re: self.re.sinh() * self.im.cos(),
               im: self.re.cosh() * self.im.sin(), }
    }

    /// Hyperbolic cosine.
    #[must_use]
    pub fn cosh(self) -> Self {
        Self { re: self.re.cosh() * self.im.cos(),
               im: self.re.sinh() * self.im.sin(), }
    }

    /// Hyperbolic tangent.
    #[must_use]
    pub fn tanh(self) -> Self {
        self.sinh() / self.cosh()
    }

    /// Applies `f` to both components.
    #[must_use]
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self { re: f(self.re),
               im: f(self.im), }
    }
}

impl From<f64> for Imaginary {
    fn from(re: f64) -> Self {
        Self { re, im: 0.0 }
    }
}

impl ops::Neg for Imaginary {
    type Output = Self;

    fn neg(self) -> Self {
        Self { re: -self.re,
               im: -self.im, }
    }
}

impl ops::Add for Imaginary {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { re: self.re + rhs.re,
               im: self.im + rhs.im, }
    }
}

impl ops::Sub for Imaginary {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self { re: self.re - rhs.re,
               im: self.im - rhs.im, }
    }
}

impl ops::Mul for Imaginary {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self { re: self.re.mul_add(rhs.re, -(self.im * rhs.im)),
               im: self.re.mul_add(rhs.im, self.im * rhs.re), }
    }
}

impl ops::Div for Imaginary {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        let denominator = rhs.re.mul_add(rhs.re, rhs.im * rhs.im);
        Self { re: self.re.mul_add(rhs.re, self.im * rhs.im) / denominator,
               im: self.im.mul_add(rhs.re, -(self.re * rhs.im)) / denominator, }
    }
}

impl PartialEq for Imaginary {
    fn eq(&self, other: &Self) -> bool {
        OrderedFloat(self.re) == OrderedFloat(other.re)
        && OrderedFloat(self.im) == OrderedFloat(other.im)
    }
}
