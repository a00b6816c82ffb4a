use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use galmorph::data::model::{COL_P_DISK, COL_P_IRR, COL_P_SPHEROID, COL_SNAPSHOT, COL_SUBHALO_ID};

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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Scores for one galaxy: one dominant class, the rest sharing what is left.
/// Indices: 0 = spheroid, 1 = disk, 2 = irregular.
fn draw_scores(rng: &mut SimpleRng, weights: [f64; 3]) -> [f64; 3] {
    let total: f64 = weights.iter().sum();
    let mut pick = rng.next_f64() * total;
    let mut dominant = 2;
    for (i, w) in weights.iter().enumerate() {
        if pick < *w {
            dominant = i;
            break;
        }
        pick -= w;
    }

    let top = rng.uniform(0.35, 0.98);
    let split = rng.next_f64();
    let rest = 1.0 - top;
    let mut scores = [0.0; 3];
    let mut others = (0..3).filter(|&i| i != dominant);
    scores[dominant] = top;
    if let (Some(a), Some(b)) = (others.next(), others.next()) {
        scores[a] = rest * split;
        scores[b] = rest * (1.0 - split);
    }
    scores
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "morphologies_snapshot_data.parquet".to_string());

    let mut rng = SimpleRng::new(42);

    // IllustrisTNG-style snapshot numbers; later snapshots hold more
    // galaxies and more spheroids.
    let snapshots: [i64; 8] = [21, 25, 33, 40, 50, 59, 67, 78];

    let mut all_id: Vec<i64> = Vec::new();
    let mut all_snap: Vec<i64> = Vec::new();
    let mut all_sph: Vec<f64> = Vec::new();
    let mut all_disk: Vec<f64> = Vec::new();
    let mut all_irr: Vec<f64> = Vec::new();

    for (k, &snap) in snapshots.iter().enumerate() {
        let age = k as f64 / (snapshots.len() - 1) as f64;
        let weights = [0.2 + 0.4 * age, 0.5, 0.3 - 0.2 * age];
        let n_galaxies = 150 + 60 * k;

        for id in 0..n_galaxies {
            let [s, d, i] = draw_scores(&mut rng, weights);
            all_id.push(id as i64);
            all_snap.push(snap);
            all_sph.push(s);
            all_disk.push(d);
            all_irr.push(i);
        }
    }

    let n_rows = all_id.len();
    let schema = Arc::new(Schema::new(vec![
        Field::new(COL_SUBHALO_ID, DataType::Int64, false),
        Field::new(COL_SNAPSHOT, DataType::Int64, false),
        Field::new(COL_P_SPHEROID, DataType::Float64, false),
        Field::new(COL_P_DISK, DataType::Float64, false),
        Field::new(COL_P_IRR, DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(all_id)),
            Arc::new(Int64Array::from(all_snap)),
            Arc::new(Float64Array::from(all_sph)),
            Arc::new(Float64Array::from(all_disk)),
            Arc::new(Float64Array::from(all_irr)),
        ],
    )
    .context("building record batch")?;

    // Write Parquet
    let file = std::fs::File::create(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    println!(
        "Wrote {n_rows} galaxies across {} snapshots to {output_path}",
        snapshots.len()
    );
    Ok(())
}
