use std::fs::File;
use std::io::{BufWriter, Write};

use yelp_explorer::data::model::Schedule;
use yelp_explorer::Record;

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

// (city, state, latitude, longitude, listings)
const CITIES: [(&str, &str, f64, f64, usize); 5] = [
    ("Philadelphia", "PA", 39.9526, -75.1652, 400),
    ("Tucson", "AZ", 32.2226, -110.9747, 250),
    ("Tampa", "FL", 27.9506, -82.4572, 250),
    ("Nashville", "TN", 36.1627, -86.7816, 200),
    ("Reno", "NV", 39.5296, -119.8138, 100),
];

const DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const CATEGORIES: [&str; 14] = [
    "Pizza",
    "Italian",
    "Mexican",
    "Burgers",
    "Sandwiches",
    "Coffee & Tea",
    "Bars",
    "Nightlife",
    "Breakfast & Brunch",
    "Sushi Bars",
    "Chinese",
    "Food",
    "American (New)",
    "Fast Food",
];

const NON_FOOD: [&str; 6] = [
    "Hair Salons",
    "Auto Repair",
    "Shopping",
    "Home Services",
    "Doctors",
    "Pets",
];

const NAME_PARTS: [&str; 8] = [
    "Golden", "Corner", "Blue", "Old Town", "Lucky", "Sunset", "Urban", "Maple",
];

fn schedule(rng: &mut SimpleRng, rating: f64) -> Option<Schedule> {
    if rng.next_f64() < 0.15 {
        return None;
    }
    // Better-rated places tend to open a little later in this sample.
    let base = (7.0 + rating * 0.6 + rng.gauss(0.0, 1.5)).clamp(5.0, 14.0) as u32;
    let closing = (base + 8 + rng.below(6) as u32) % 24;

    let mut hours = Schedule::new();
    for (i, day) in DAYS.iter().enumerate() {
        if i == 6 && rng.next_f64() < 0.3 {
            continue;
        }
        let open = if i >= 5 { base + 1 } else { base };
        hours.insert(day.to_string(), format!("{open}:0-{closing}:0"));
    }
    // A few closed-day markers like in the real dump.
    if rng.next_f64() < 0.05 {
        hours.insert("Sunday".to_string(), "0:0-0:0".to_string());
    }
    Some(hours)
}

fn categories(rng: &mut SimpleRng) -> Option<String> {
    if rng.next_f64() < 0.05 {
        return None;
    }
    let mut picked: Vec<&str> = Vec::new();
    if rng.next_f64() < 0.7 {
        picked.push("Restaurants");
        for _ in 0..1 + rng.below(3) {
            let c = rng.pick(&CATEGORIES);
            if !picked.contains(&c) {
                picked.push(c);
            }
        }
    } else {
        picked.push(rng.pick(&NON_FOOD));
    }
    // Shuffle so the marker category is not always first.
    let len = picked.len();
    picked.swap(0, rng.below(len));
    Some(picked.join(", "))
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let output_path = "sample_data.json";
    let file = File::create(output_path).expect("Failed to create output file");
    let mut writer = BufWriter::new(file);

    let mut count = 0usize;
    for &(city, state, lat, lon, listings) in &CITIES {
        for _ in 0..listings {
            let rating = ((rng.gauss(3.7, 0.8).clamp(1.0, 5.0)) * 2.0).round() / 2.0;
            let review_count = (rng.gauss(3.5, 1.2).exp().max(5.0)) as u64;
            // Dense core around the centre plus a sparse outskirts fringe.
            let spread = if rng.next_f64() < 0.85 { 0.03 } else { 0.4 };

            let record = Record {
                id: format!("b{count:06}"),
                name: format!("{} {}", rng.pick(&NAME_PARTS), city),
                city: Some(city.to_string()),
                state: Some(state.to_string()),
                latitude: Some(rng.gauss(lat, spread)),
                longitude: Some(rng.gauss(lon, spread)),
                rating,
                review_count,
                categories: categories(&mut rng),
                hours: schedule(&mut rng, rating),
            };

            serde_json::to_writer(&mut writer, &record).expect("Failed to serialize listing");
            writeln!(writer).expect("Failed to write listing");
            count += 1;
        }
    }
    writer.flush().expect("Failed to flush output");

    println!("Wrote {count} listings to {output_path}");
}
