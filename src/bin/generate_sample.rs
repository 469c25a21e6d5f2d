use anyhow::{Context, Result};

/// Simple saturating response: `amplitude * dose / (dose + ec50) * (1 - exp(-rate * t))`.
fn response(dose: f64, t: f64, amplitude: f64, ec50: f64, rate: f64) -> f64 {
    amplitude * dose / (dose + ec50) * (1.0 - (-rate * t).exp())
}

/// Deterministic measurement noise: splitmix64 draws, summed twelve at a
/// time into an approximately normal deviate (Irwin-Hall).
struct Jitter(u64);

impl Jitter {
    fn uniform(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Zero-mean error with standard deviation `sd`.
    fn error(&mut self, sd: f64) -> f64 {
        let sum: f64 = (0..12).map(|_| self.uniform()).sum();
        sd * (sum - 6.0)
    }
}

fn tsv_writer(path: &str) -> Result<csv::Writer<std::fs::File>> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("creating {path}"))
}

fn main() -> Result<()> {
    env_logger::init();
    let mut jitter = Jitter(42);

    let conditions = [("c_low", 0.1), ("c_mid", 1.0), ("c_high", 10.0)];
    // (observableId, amplitude, ec50, rate, noise sd)
    let observables = [("pAkt", 2.0, 0.5, 0.3, 0.05), ("pERK", 1.2, 2.0, 0.1, 0.08)];
    let times = [0.0, 2.5, 5.0, 10.0, 20.0];
    let replicates = 3;

    let mut cond_wtr = tsv_writer("sample_conditions.tsv")?;
    cond_wtr.write_record(["conditionId", "conditionName", "dose"])?;
    for (id, dose) in &conditions {
        cond_wtr.write_record([id.to_string(), id.replace("c_", ""), dose.to_string()])?;
    }
    cond_wtr.flush()?;

    let mut meas_wtr = tsv_writer("sample_measurements.tsv")?;
    let mut sim_wtr = tsv_writer("sample_simulations.tsv")?;
    meas_wtr.write_record([
        "observableId",
        "simulationConditionId",
        "time",
        "measurement",
        "noiseParameters",
        "datasetId",
    ])?;
    sim_wtr.write_record([
        "observableId",
        "simulationConditionId",
        "time",
        "simulation",
        "datasetId",
    ])?;

    let mut n_rows = 0;
    for &(obs, amplitude, ec50, rate, noise) in &observables {
        for &(cond, dose) in &conditions {
            let dataset = format!("{obs}_{cond}");
            for &t in &times {
                let truth = response(dose, t, amplitude, ec50, rate);
                sim_wtr.write_record([
                    obs.to_string(),
                    cond.to_string(),
                    t.to_string(),
                    truth.to_string(),
                    dataset.clone(),
                ])?;
                for _ in 0..replicates {
                    let y = truth + jitter.error(noise);
                    meas_wtr.write_record([
                        obs.to_string(),
                        cond.to_string(),
                        t.to_string(),
                        format!("{y:.5}"),
                        noise.to_string(),
                        dataset.clone(),
                    ])?;
                    n_rows += 1;
                }
            }
        }
    }
    meas_wtr.flush()?;
    sim_wtr.flush()?;

    let mut vis_wtr = tsv_writer("sample_visualization.tsv")?;
    vis_wtr.write_record([
        "plotId",
        "plotName",
        "datasetId",
        "xValues",
        "yValues",
        "plotTypeData",
        "legendEntry",
    ])?;
    for &(obs, ..) in &observables {
        for &(cond, dose) in &conditions {
            vis_wtr.write_record([
                format!("time_course_{obs}"),
                format!("{obs} time course"),
                format!("{obs}_{cond}"),
                "time".to_string(),
                obs.to_string(),
                "MeanAndSD".to_string(),
                format!("dose {dose}"),
            ])?;
        }
    }
    for &(cond, _) in &conditions {
        vis_wtr.write_record([
            "dose_response".to_string(),
            "pAkt dose response".to_string(),
            format!("pAkt_{cond}"),
            "dose".to_string(),
            "pAkt".to_string(),
            "provided".to_string(),
            String::new(),
        ])?;
    }
    vis_wtr.flush()?;

    println!(
        "Wrote {n_rows} measurements ({} observables x {} conditions x {} time points x {replicates} replicates)",
        observables.len(),
        conditions.len(),
        times.len()
    );
    Ok(())
}
