use crate::common::{Envelope, EnvelopeSchema};

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Welcome message", body = EnvelopeSchema),
    ),
    tag = "health"
)]
pub async fn welcome() -> Envelope<()> {
    Envelope::message("Welcome to Geo5Lux Admin API")
}
