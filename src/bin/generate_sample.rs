//! Writes a deterministic synthetic appointment table for trying the
//! dashboard without the real dataset.
//!
//! ```text
//! cargo run --bin generate_sample -- [output.parquet|output.csv] [rows]
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use noshow_dash::data::model::{Column, Covariate};

const NEIGHBOURHOODS: [&str; 8] = [
    "JARDIM CAMBURI",
    "MARIA ORTIZ",
    "RESISTÊNCIA",
    "JARDIM DA PENHA",
    "ITARARÉ",
    "CENTRO",
    "TABUAZEIRO",
    "SANTA MARTHA",
];

#[derive(Debug, Serialize)]
struct SampleRow {
    neighbourhood: &'static str,
    age: i64,
    gender: &'static str,
    no_show: &'static str,
    scholarship: i64,
    sms_received: i64,
    handcap: i64,
    hipertension: i64,
    diabetes: i64,
    alcoholism: i64,
    days_until_appointment: i64,
}

/// splitmix64: small, seedable, good enough for fake data.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

fn generate(rows: usize, rng: &mut SampleRng) -> Vec<SampleRow> {
    (0..rows)
        .map(|_| {
            let neighbourhood = NEIGHBOURHOODS[rng.below(NEIGHBOURHOODS.len() as u64) as usize];
            let age = rng.below(100) as i64;
            let gender = if rng.chance(0.65) { "F" } else { "M" };
            let hipertension = rng.chance(if age > 50 { 0.4 } else { 0.08 });
            let diabetes = rng.chance(if hipertension { 0.3 } else { 0.04 });
            let handcap = match rng.below(100) {
                0..=97 => 0,
                98 => 1,
                _ => 2 + rng.below(3) as i64,
            };

            // Long lags: mostly same-week bookings, with a tail out to ~6 months.
            let days_until_appointment = if rng.chance(0.35) {
                0
            } else {
                (-(1.0 - rng.next_f64()).ln() * 14.0).min(179.0) as i64
            };
            let sms_received = days_until_appointment > 2 && rng.chance(0.55);

            let mut p_no_show = 0.12 + 0.004 * days_until_appointment.min(40) as f64;
            if age < 30 {
                p_no_show += 0.04;
            }
            if sms_received {
                p_no_show -= 0.03;
            }

            SampleRow {
                neighbourhood,
                age,
                gender,
                no_show: if rng.chance(p_no_show) { "Yes" } else { "No" },
                scholarship: rng.chance(0.1) as i64,
                sms_received: sms_received as i64,
                handcap,
                hipertension: hipertension as i64,
                diabetes: diabetes as i64,
                alcoholism: rng.chance(0.03) as i64,
                days_until_appointment,
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let text_col = |f: fn(&SampleRow) -> &'static str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let int_col = |f: fn(&SampleRow) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let columns: Vec<ArrayRef> = Column::REQUIRED
        .iter()
        .map(|col| match col {
            Column::Neighbourhood => text_col(|r| r.neighbourhood),
            Column::Gender => text_col(|r| r.gender),
            Column::NoShow => text_col(|r| r.no_show),
            Column::Age => int_col(|r| r.age),
            Column::Covariate(Covariate::Scholarship) => int_col(|r| r.scholarship),
            Column::Covariate(Covariate::SmsReceived) => int_col(|r| r.sms_received),
            Column::Covariate(Covariate::Handcap) => int_col(|r| r.handcap),
            Column::Covariate(Covariate::Hipertension) => int_col(|r| r.hipertension),
            Column::Covariate(Covariate::Diabetes) => int_col(|r| r.diabetes),
            Column::Covariate(Covariate::Alcoholism) => int_col(|r| r.alcoholism),
            Column::DaysUntilAppointment => int_col(|r| r.days_until_appointment),
        })
        .collect();

    let schema = Arc::new(Schema::new(
        Column::REQUIRED
            .iter()
            .zip(&columns)
            .map(|(col, array)| Field::new(col.name(), array.data_type().clone(), false))
            .collect::<Vec<_>>(),
    ));

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output_path = PathBuf::from(
        args.next()
            .unwrap_or_else(|| "sample_appointments.parquet".to_string()),
    );
    let rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count '{n}'"))?,
        None => 20_000,
    };

    let mut rng = SampleRng(42);
    let data = generate(rows, &mut rng);

    let ext = output_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => write_csv(&output_path, &data)?,
        "parquet" | "pq" => write_parquet(&output_path, &data)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    println!("Wrote {} appointments to {}", data.len(), output_path.display());
    Ok(())
}
