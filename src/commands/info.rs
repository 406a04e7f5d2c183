use crate::system::HostSnapshot;
use anyhow::Result;

pub fn run(host: &HostSnapshot, json: bool, color: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(host)?);
    } else {
        host.print(color);
    }

    Ok(())
}
