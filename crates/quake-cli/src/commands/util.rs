use anyhow::{anyhow, Result};

/// Worker count for `--threads`: `auto` means every CPU.
pub fn parse_threads(spec: &str) -> Result<usize> {
    let spec = spec.trim();
    if spec.eq_ignore_ascii_case("auto") {
        return Ok(num_cpus::get());
    }
    match spec.parse::<usize>() {
        Ok(0) | Err(_) => Err(anyhow!(
            "invalid --threads value '{}'; use 'auto' or a positive number",
            spec
        )),
        Ok(count) => Ok(count),
    }
}
