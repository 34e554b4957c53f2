//! Generate static pages from CMS content

use anyhow::Result;

use crate::generator::Generator;
use crate::Waypost;

/// Pre-render the listing page and every post the CMS currently knows
pub async fn run(app: &Waypost) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(app);
    let generated = generator.generate().await?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated listing and {} post pages in {:.2}s",
        generated.len(),
        duration.as_secs_f64()
    );

    Ok(())
}
