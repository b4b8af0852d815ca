//! Operations defined purely as compositions of the primitive constructors.
//!
//! Nothing here introduces a node kind: simplification and differentiation of these operations
//! come entirely from the primitives they expand to.
use super::node::Formula;
use crate::error::Result;

impl Formula {
    /// `-F = -1 * F`
    pub fn minus(&self) -> Result<Formula> {
        Formula::int(-1).scal(self)
    }

    /// `A - B = A + (-B)`
    pub fn subtract(&self, other: &Formula) -> Result<Formula> {
        self.add(&other.minus()?)
    }

    /// `1 / F = F^-1`
    pub fn inv(&self) -> Result<Formula> {
        self.pow(-1)
    }

    /// The constant `1 / n`.
    pub fn int_inv(n: i32) -> Result<Formula> {
        Formula::int(n).inv()
    }

    /// `A / B = A * B^-1`, with `B` scalar.
    pub fn divide(&self, other: &Formula) -> Result<Formula> {
        self.scal(&other.inv()?)
    }

    /// `F^2`
    pub fn square(&self) -> Result<Formula> {
        self.pow(2)
    }

    /// `A^B = exp(B * log(A))` for real `B`.
    ///
    /// `A` must evaluate to a positive number; this is not checked.
    pub fn powf(&self, exponent: &Formula) -> Result<Formula> {
        exponent.scal(&self.log()?)?.exp()
    }

    /// `sqrt(F) = F^(1/2)`, through [`Formula::powf`].
    pub fn sqrt(&self) -> Result<Formula> {
        self.powf(&Formula::int_inv(2)?)
    }

    /// `|F|^2 = <F|F>`
    pub fn sqnorm2(&self) -> Result<Formula> {
        self.scalprod(self)
    }

    /// `|F| = sqrt(<F|F>)`
    pub fn norm2(&self) -> Result<Formula> {
        self.sqnorm2()?.sqrt()
    }
}
