use memostash::memoize;

#[memoize]
fn fac(n: u64) -> u64 {
    if n < 2 {
        1
    } else {
        n * fac(n - 1)
    }
}

fn main() {
    let fibs = (0..21)
        .map(memostash::fib::fibonacci_unbounded)
        .collect::<Vec<u64>>();
    println!("fib([0,...,20]) = {:?}", fibs);
    println!("entries memoized: {}", memostash::fib::memoized_size_fibonacci_unbounded());

    let facs = (0..21).map(fac).collect::<Vec<u64>>();
    println!("fac([0,...,20]) = {:?}", facs);
}
