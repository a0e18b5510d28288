use memostash::fib::{fibonacci_cached, fibonacci_recursive};
use memostash::{load_result_from_disk, measure_time, save_result, Tree};

#[save_result(Format: Excel)]
fn fibonacci_cached_save(n: u64) -> u64 {
    fibonacci_cached(n)
}

fn main() -> memostash::Result<()> {
    memostash::logging::init_tracing();

    let root = Tree::with_children(10, vec![Tree::leaf(5), Tree::leaf(8), Tree::leaf(3)]);
    println!("Minimum value in the tree: {}", root.min_value());

    let n = 18;
    println!("\nMeasure time for Fibonacci Recursive:");
    measure_time("fibonacci_recursive", || fibonacci_recursive(n));

    println!("\nMeasure time for Fibonacci Cached:");
    measure_time("fibonacci_cached", || fibonacci_cached(n));

    println!("\nMeasure time for Fibonacci Cached with Save Decorator:");
    measure_time("fibonacci_cached_save", || fibonacci_cached_save(n))?;

    let loaded = load_result_from_disk(
        &persisted_path_fibonacci_cached_save(),
        memostash::SaveFormat::Spreadsheet,
    )?;
    let values: Vec<String> = loaded.iter().map(ToString::to_string).collect();
    println!("Loaded result from disk: [{}]", values.join(", "));
    Ok(())
}
