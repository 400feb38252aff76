use anyhow::Result;
use postfilter::{FilterOptions, PostFilter, TimeWindow};
use time::macros::datetime;

// Change this path to the file or folder you want to process.
const INPUT_PATH: &str = "E:/RedditDownloads/reddit/submissions/RS_2025-07.zst";
const OUTPUT_PATH: &str = "filtered_posts.json";
const RECURSIVE: bool = false;

fn main() -> Result<()> {
    let window = TimeWindow::new(
        datetime!(2025-07-04 00:00:00 UTC),
        datetime!(2025-07-11 23:59:59 UTC),
    );
    let terms = ["texas flood", "tx flood", "houston flood", "flash flood", "rain damage"];

    let opts = FilterOptions::default()
        .with_window(window)
        .with_terms(terms)
        .with_input(INPUT_PATH)
        .with_recursive(RECURSIVE)
        .with_output(OUTPUT_PATH);

    let summary = PostFilter::with_options(opts).run()?;
    println!(
        "Scanned {} records in {} files ({} skipped), {} posts matched",
        summary.records_scanned, summary.files_seen, summary.files_skipped, summary.matched
    );

    println!("Done :>");
    Ok(())
}
