use crate::cli::ScheduleArgs;
use crate::config;
use crate::error::{CliError, Result};
use chromofold::engine::schedule::Schedule;

pub fn run(args: ScheduleArgs) -> Result<()> {
    let (temp_start, temp_end, num_temp_steps) = config::build_schedule_params(&args)?;
    let schedule =
        Schedule::build(temp_start, temp_end, num_temp_steps).map_err(CliError::Core)?;

    println!("{:>6}  {:>14}  {:>16}", "step", "temperature", "repulsion-scale");
    for (step, stage) in schedule.stages().iter().enumerate() {
        println!(
            "{:>6}  {:>14.4}  {:>16.4}",
            step, stage.temperature, stage.repulsion_scale
        );
    }
    Ok(())
}
