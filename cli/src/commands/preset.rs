use anyhow::Result;
use assembly_line_core::SimulationConfig;

/// Print the built-in laptop line so it can be saved and edited.
pub fn execute() -> Result<()> {
    let json = serde_json::to_string_pretty(&SimulationConfig::laptop_line())?;
    println!("{}", json);
    Ok(())
}
