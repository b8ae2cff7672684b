//! Measures how many slots a lookup inspects under each probing policy of
//! [`OpenAddressingHashMap`] as the table fills up, and charts the average and
//! worst probe lengths.

use std::error::Error;

use hashtab::{
    OpenAddressingBuilder, OpenAddressingHashMap, Probing,
    hashing::{HashFn, modulo},
};
use plotters::prelude::*;
use rand::Rng;

/// Requested size; the tables hold `next_prime(2 * TABLE_SIZE)` slots
const TABLE_SIZE: usize = 50_000;

/// Number of fill levels measured, evenly spaced below 1
const FILL_STEPS: usize = 9;

/// Growth threshold of the measured tables, high enough that they never grow
/// while being measured
const MAX_FILL_FACTOR: f64 = 0.95;

/// Line colors, one per probing policy
const COLORS: [RGBColor; 3] = [RGBColor(220, 50, 50), RGBColor(50, 90, 220), RGBColor(50, 180, 50)];

/// Probe lengths observed at one fill level
#[derive(Debug, Clone, Copy)]
struct ProbeStats {
    /// Fill factor of the table when measured
    fill_factor: f64,
    /// Mean number of slots inspected to find a stored key
    average: f64,
    /// Largest number of slots inspected to find a stored key
    worst: usize,
}

/// A named series of `(fill factor, probes)` points
type Series = (&'static str, Vec<(f64, f64)>);

/// Step hash for double hashing, never zero
fn secondary(key: &u64, modulus: usize) -> usize {
    modulo(key, modulus.saturating_sub(2)).saturating_add(1)
}

/// The policies being compared
fn policies() -> [(&'static str, Probing<u64>); 3] {
    [
        ("Linear probing", Probing::Linear),
        ("Quadratic probing", Probing::Quadratic),
        ("Double hashing", Probing::DoubleHashing(secondary)),
    ]
}

/// Fills a fresh table with `keys` step by step and records the probe lengths
/// of every stored key at each fill level
#[allow(clippy::cast_precision_loss)]
fn measure(probing: Probing<u64>, keys: &[u64]) -> Result<Vec<ProbeStats>, Box<dyn Error>> {
    let hash: HashFn<u64> = modulo;
    let mut map: OpenAddressingHashMap<u64, u64> = OpenAddressingBuilder::new(hash)
        .size(TABLE_SIZE)
        .probing(probing)
        .max_fill_factor(MAX_FILL_FACTOR)
        .build()?;
    let capacity = map.capacity();

    let mut stats = Vec::with_capacity(FILL_STEPS);
    let mut inserted = 0;
    for step in 1..=FILL_STEPS {
        let target = capacity
            .saturating_mul(step)
            .checked_div(FILL_STEPS.saturating_add(1))
            .unwrap_or(0)
            .min(keys.len());
        map.extend(keys.iter().take(target).skip(inserted).map(|&key| (key, key)));
        inserted = target;

        let lengths: Vec<usize> = keys.iter().take(target).map(|key| map.probe_length(key)).collect();
        let total: usize = lengths.iter().sum();
        let average = match lengths.len() {
            0 => 0.0,
            len => total as f64 / len as f64,
        };
        let worst = lengths.iter().copied().max().unwrap_or(0);
        stats.push(ProbeStats { fill_factor: map.fill_factor(), average, worst });
    }
    Ok(stats)
}

/// Draws one line per series into a PNG file
fn plot(path: &str, caption: &str, y_desc: &str, series: &[Series]) -> Result<(), Box<dyn Error>> {
    let font_family = "sans-serif";
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|&(_, y)| y))
        .fold(1.0, f64::max) *
        1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0.0..1.0, 0.0..max_y)?;

    chart
        .configure_mesh()
        .x_desc("Fill factor")
        .y_desc(y_desc)
        .axis_desc_style((font_family, 16))
        .draw()?;

    for ((name, points), color) in series.iter().zip(COLORS) {
        let line_style = ShapeStyle::from(&color).stroke_width(2);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), line_style))?
            .label(*name)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x.saturating_add(20), y)], line_style)
            });
        chart.draw_series(points.iter().map(|&point| Circle::new(point, 4, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Measures every policy and writes the charts to the working directory
#[allow(clippy::cast_precision_loss)]
fn main() -> Result<(), Box<dyn Error>> {
    let mut rng = rand::rng();
    let keys: Vec<u64> =
        (0..TABLE_SIZE.saturating_mul(2)).map(|_| rng.random_range(1..1_000_000_000)).collect();

    let mut averages: Vec<Series> = Vec::new();
    let mut worsts: Vec<Series> = Vec::new();
    for (name, probing) in policies() {
        println!("{name}");
        let stats = measure(probing, &keys)?;
        for level in &stats {
            println!(
                "  fill = {:.2}: avg probes = {:.2}, worst = {}",
                level.fill_factor, level.average, level.worst
            );
        }
        averages.push((name, stats.iter().map(|level| (level.fill_factor, level.average)).collect()));
        worsts.push((
            name,
            stats.iter().map(|level| (level.fill_factor, level.worst as f64)).collect(),
        ));
    }

    plot("average_probe_length.png", "Average Probe Length", "Slots inspected", &averages)?;
    plot("worst_probe_length.png", "Worst-Case Probe Length", "Slots inspected", &worsts)?;
    Ok(())
}
