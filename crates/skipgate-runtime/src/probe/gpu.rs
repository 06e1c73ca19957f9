//! GPU device counting.

use std::process::Command;

/// Count GPUs visible to this process.
///
/// Lists devices with `nvidia-smi`; a missing driver or tool means no GPUs.
/// `CUDA_VISIBLE_DEVICES` narrows the count the way CUDA runtimes do.
pub fn detect_gpu_count(visible_devices: Option<&str>) -> u32 {
    let listed = Command::new("nvidia-smi")
        .arg("--list-gpus")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map_or(0, |o| count_listed_gpus(&String::from_utf8_lossy(&o.stdout)));

    match visible_devices.map(count_visible_devices) {
        Some(visible) => listed.min(visible),
        None => listed,
    }
}

/// Count `GPU n: ...` lines in `nvidia-smi --list-gpus` output.
pub fn count_listed_gpus(stdout: &str) -> u32 {
    let count = stdout
        .lines()
        .filter(|line| line.trim_start().starts_with("GPU "))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Count entries of a `CUDA_VISIBLE_DEVICES` value.
///
/// Entries after the first invalid one (empty or negative) are ignored.
pub fn count_visible_devices(value: &str) -> u32 {
    let count = value
        .split(',')
        .map(str::trim)
        .take_while(|entry| !entry.is_empty() && !entry.starts_with('-'))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
