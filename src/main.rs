#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    barangay_certificates::run().await
}
