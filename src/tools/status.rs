//! Larder Status Tool
//!
//! Provides runtime status information about the Larder service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Usage instructions for AI assistants
pub const INGREDIENT_INSTRUCTIONS: &str = r#"
# Larder Instructions

Larder tracks pantry ingredients and the recipes that use them.

## Units

Only these units are accepted, spelled exactly as shown:

| Family | Units (smallest to largest) |
|--------|-----------------------------|
| Volume | tsp, tbsp, fl oz, cup, pt, qt, gal |
| Weight | oz, lbs |

Volume and weight never convert into each other. Amounts must be zero or
positive.

## Storage

Every amount is stored in the smallest unit of its family (tsp or oz).
You can enter amounts in any unit; `add_ingredient` and `create_recipe`
convert them before saving.

## Display modes

Tools that return quantities accept an optional `mode`:

- `largest-unit` (default): the largest unit in which the amount is still
  greater than 1. `0.5 cup` is shown as `4 fl oz`. A conversion that would
  land on exactly 1 is not taken, so `2 cup` stays `2 cup` rather than `1 pt`.
- `breakdown`: whole amounts of decreasing units, e.g. `1 qt 1 cup 4 fl oz`.
  Any fraction left at the smallest unit is shown as-is.

`convert_quantity` also accepts `base` to see the stored form.

## Workflow

1. `add_ingredient` for each pantry item (name, amount, unit)
2. `create_recipe` with name, instructions and a list of ingredient usages;
   every ingredient must already exist in the pantry
3. `get_recipe` / `get_ingredient` / `list_ingredients` to read back
4. `delete_ingredient` is blocked while a recipe uses the ingredient
"#;

/// Runtime status of the Larder service
#[derive(Debug, Clone, Serialize)]
pub struct LarderStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> LarderStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        LarderStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(PathBuf::from("does/not/exist.db"));
        let status = tracker.get_status();
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    }
}
