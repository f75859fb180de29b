//! Process memory statistics for experiment binaries.
//!
//! On Linux the kernel reports memory high-water marks in `/proc/self/status`. Other platforms
//! report zeros.

/// Memory high-water marks of the current process, in kilobytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryUsage {
    /// Peak virtual memory size (`VmPeak`).
    pub peak_virtual_kb: u64,
    /// Peak resident set size (`VmHWM`).
    pub peak_resident_kb: u64,
}

/// Reads the memory high-water marks of the current process.
#[cfg(target_os = "linux")]
pub fn memory_usage() -> MemoryUsage {
    match std::fs::read_to_string("/proc/self/status") {
        Ok(status) => parse_status(&status),
        Err(err) => {
            log::warn!("Could not read /proc/self/status: {err}");
            MemoryUsage::default()
        }
    }
}

#[cfg(not(target_os = "linux"))]
pub fn memory_usage() -> MemoryUsage {
    use std::sync::Once;
    static WARN_ONCE: Once = Once::new();
    WARN_ONCE.call_once(|| {
        log::warn!("Memory statistics are only supported on Linux; reporting 0.");
    });
    MemoryUsage::default()
}

/// Extracts `VmPeak` and `VmHWM` from the contents of a `/proc/<pid>/status` file.
pub fn parse_status(status: &str) -> MemoryUsage {
    let field = |name: &str| {
        status
            .lines()
            .find_map(|line| line.strip_prefix(name))
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(|value| value.parse().ok())
            .unwrap_or(0)
    };
    MemoryUsage {
        peak_virtual_kb: field("VmPeak:"),
        peak_resident_kb: field("VmHWM:"),
    }
}
