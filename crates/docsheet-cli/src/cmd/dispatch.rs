/// Implementation of `docsheet dispatch`.
///
/// Without `--quantity` this runs the packing-order variant; with it, the
/// packing-order-quantity variant.
use std::path::Path;

use docsheet_core::variant::{DISPATCH_SUFFIX, ORDER_FILE, PACKING_FILE, QUANTITY_FILE};
use docsheet_core::{ConversionRequest, VariantKind};

use crate::cmd::{Settings, convert_and_write};
use crate::error::CliError;

/// Runs the `dispatch` command.
///
/// # Errors
///
/// Returns [`CliError`] on I/O failures or conversion errors.
pub fn run(
    packing: &Path,
    order: &Path,
    quantity: Option<&Path>,
    suffix: Option<&str>,
    settings: &Settings,
) -> Result<(), CliError> {
    let mut request = ConversionRequest::new()
        .upload(settings.upload(packing, PACKING_FILE)?)
        .upload(settings.upload(order, ORDER_FILE)?);

    let kind = match quantity {
        Some(path) => {
            request = request.upload(settings.upload(path, QUANTITY_FILE)?);
            if let Some(suffix) = suffix {
                request = request.param(DISPATCH_SUFFIX, suffix);
            }
            VariantKind::PackingOrderQuantity
        }
        None => VariantKind::PackingOrder,
    };
    convert_and_write(kind, &request, settings, None)
}
