use plotters::prelude::*;

/// Width of each score bin.
pub const BIN_WIDTH: u32 = 100;

/// Fixed bins spanning [0, 1000].
pub const BIN_COUNT: usize = 10;

/// Bucket scores into the ten fixed-width bins. A score of exactly 1000
/// falls in the last bin.
pub fn bin_scores(scores: &[u32]) -> [u32; BIN_COUNT] {
    let mut bins = [0u32; BIN_COUNT];
    for &score in scores {
        let bin = ((score / BIN_WIDTH) as usize).min(BIN_COUNT - 1);
        bins[bin] += 1;
    }
    bins
}

/// Render the credit score distribution as a bar chart PNG.
pub fn render_histogram(path: &str, scores: &[u32]) -> eyre::Result<()> {
    let bins = bin_scores(scores);
    let tallest = bins.iter().copied().max().unwrap_or(0).max(1);
    let y_top = tallest + tallest / 10 + 1;

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| eyre::eyre!("Failed to render histogram '{}': {}", path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Wallet Credit Score Distribution", ("sans-serif", 28))
        .margin(16)
        .x_label_area_size(44)
        .y_label_area_size(52)
        .build_cartesian_2d(0u32..1000u32, 0u32..y_top)
        .map_err(|e| eyre::eyre!("Failed to render histogram '{}': {}", path, e))?;

    chart
        .configure_mesh()
        .x_desc("Credit Score")
        .y_desc("Number of Wallets")
        .x_labels(11)
        .draw()
        .map_err(|e| eyre::eyre!("Failed to render histogram '{}': {}", path, e))?;

    chart
        .draw_series(bins.iter().enumerate().map(|(bin, &count)| {
            let x0 = bin as u32 * BIN_WIDTH;
            Rectangle::new([(x0, 0), (x0 + BIN_WIDTH, count)], BLUE.mix(0.5).filled())
        }))
        .map_err(|e| eyre::eyre!("Failed to render histogram '{}': {}", path, e))?;

    root.present()
        .map_err(|e| eyre::eyre!("Failed to write histogram '{}': {}", path, e))?;

    tracing::info!(wallets = scores.len(), path, "Score distribution histogram written");
    Ok(())
}
