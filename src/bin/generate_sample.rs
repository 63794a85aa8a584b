//! Generate a deterministic sample CSV for trying out csvbatch:
//!
//! ```text
//! cargo run --bin generate_sample -- sample_data.csv
//! csvbatch sample_data.csv -f "price > 40" -p units -x units -y price
//! ```

use std::env;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn next_range(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_data.csv".to_string());

    let mut rng = SimpleRng::new(42);
    let regions = ["EU", "US", "APAC"];

    let mut writer = csv::Writer::from_path(&path).expect("create sample file");
    writer
        .write_record(["id", "region", "units", "price", "in_stock"])
        .expect("write header");

    for id in 0..200 {
        let region = regions[rng.next_range(regions.len() as u64) as usize];
        let units = 1 + rng.next_range(8);
        let price = rng.gauss(45.0, 12.0).max(1.0);
        let in_stock = rng.next_f64() > 0.2;

        writer
            .write_record([
                id.to_string(),
                region.to_string(),
                units.to_string(),
                format!("{price:.2}"),
                in_stock.to_string(),
            ])
            .expect("write row");
    }

    writer.flush().expect("flush sample file");
    println!("Wrote 200 rows to {path}");
}
