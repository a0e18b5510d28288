use std::path::PathBuf;

use clap::Parser;
use memostash::analyzer::CreditDataAnalyzer;

/// Summarize a credit-card client dataset.
#[derive(Parser, Debug)]
struct Args {
    /// CSV file with age, limit_bal, bill_amt1..6 and education:1..4 columns.
    #[arg(default_value = "train.txt")]
    path: PathBuf,

    /// How many of the oldest clients to list.
    #[arg(long, default_value_t = 10)]
    top: usize,
}

fn main() -> memostash::Result<()> {
    memostash::logging::init_tracing();
    let args = Args::parse();

    let mut analyzer = CreditDataAnalyzer::new(args.path);
    analyzer.load_data()?;
    analyzer.remove_duplicates();
    analyzer.add_total_bill_column()?;
    let correlation = analyzer.calculate_correlation()?;
    let top_oldest_clients = analyzer.get_top_oldest_clients(args.top)?;

    println!("Correlation between age and credit limit:\n {}", correlation);
    println!("{}\n", analyzer.data().head(5));
    println!("{}\n", top_oldest_clients);

    print!("{}", analyzer.plot_histograms_and_scatter()?);
    Ok(())
}
