use std::path::PathBuf;

use anyhow::Result;
use websync::gate;

pub fn cmd_seed(config_paths: &[PathBuf], json: bool) -> Result<()> {
    let config = super::load_config(config_paths)?;

    for job in config.routes.table_jobs() {
        let created = gate::seed(&job.output, job.projection.numbered)?;
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "event": "seeded",
                    "output": job.output.display().to_string(),
                    "created": created,
                })
            );
        } else if created {
            println!("created {}", job.output.display());
        } else {
            println!("kept {}", job.output.display());
        }
    }
    Ok(())
}
