use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("crashwatch version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
