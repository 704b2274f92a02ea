use std::path::Path;

use nowshowing::pipeline::{BatchReport, ItemOutcome, Progress};
use nowshowing::ListingEntry;

/// Prints one line per item as the batch advances.
pub struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn item_started(&self, position: usize, total: usize, entry: &ListingEntry) {
        println!("Processing {position}/{total}: {}", entry.title);
    }

    fn item_finished(&self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Collected(record) => match record.rating {
                Some(rating) => println!(
                    "  ⭐ {rating:.1}  {} ({})  {}",
                    record.title,
                    record.release_year,
                    record.genres_display()
                ),
                None => println!(
                    "  ➖ no rating  {} ({})  {}",
                    record.title,
                    record.release_year,
                    record.genres_display()
                ),
            },
            ItemOutcome::Dropped(_) => println!("  ⚠️  No external id found, skipping"),
            ItemOutcome::Failed { entry, error } => {
                println!("  ❌ Error processing {}: {error}", entry.title);
            }
        }
    }
}

pub fn print_summary(report: &BatchReport, records_path: &Path) {
    println!("\n📊 Summary:");
    println!("   Collected:    {}", report.records.len());
    println!("   With ratings: {}", report.rated());
    println!("   Dropped:      {}", report.dropped.len());
    println!("   Failed:       {}", report.failed.len());
    println!("\n📁 Records saved to {}", records_path.display());
}
