use crate::assets::color::Color;
use crate::catalog::product::Product;
use crate::foundation::error::DrapeResult;
use crate::session::design::DesignSession;

/// Hand-off to the checkout collaborator.
///
/// The engine produces the payload and does not validate how it is used downstream.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckoutPayload {
    /// Product being bought.
    pub product: Product,
    /// PNG of the active view as customized.
    pub customized_image: Vec<u8>,
    /// Chosen product tint.
    pub selected_color: Color,
}

impl DesignSession {
    /// Build the checkout payload from the active view rendered at `multiplier`.
    pub fn checkout_payload(&self, multiplier: f64) -> DrapeResult<CheckoutPayload> {
        let png = self.export_current_view(multiplier)?.to_png()?;
        Ok(CheckoutPayload {
            product: self.product().clone(),
            customized_image: png,
            selected_color: self.global_color(),
        })
    }
}
