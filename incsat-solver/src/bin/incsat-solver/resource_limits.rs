//! The `cpu-lim` and `mem-lim` ceilings, enforced by the operating system.
//!
//! Reaching the CPU-time limit makes the kernel send SIGXCPU, which is handled like an interrupt
//! (see [`os_signal`](crate::os_signal)). Reaching the memory limit makes allocations fail, which
//! the engine reports as running out of memory. A limit which cannot be set is reported and
//! otherwise ignored.

use log::debug;
use log::warn;

const BYTES_PER_MEGABYTE: u64 = 1024 * 1024;

pub(crate) fn limit_cpu_time(seconds: u64) {
    match imp::lower_soft_limit(imp::Limit::CpuTime, seconds) {
        Ok(true) => debug!("Limited the CPU time to {seconds} seconds"),
        Ok(false) => debug!("The CPU time is already limited below {seconds} seconds"),
        Err(e) => warn!("Could not set resource limit: CPU-time ({e})"),
    }
}

pub(crate) fn limit_memory(megabytes: u64) {
    let bytes = megabytes.saturating_mul(BYTES_PER_MEGABYTE);
    match imp::lower_soft_limit(imp::Limit::VirtualMemory, bytes) {
        Ok(true) => debug!("Limited the virtual memory to {megabytes} MB"),
        Ok(false) => debug!("The virtual memory is already limited below {megabytes} MB"),
        Err(e) => warn!("Could not set resource limit: Virtual memory ({e})"),
    }
}

#[cfg(unix)]
mod imp {
    use rlimit::Resource;

    #[derive(Clone, Copy, Debug)]
    pub(super) enum Limit {
        CpuTime,
        VirtualMemory,
    }

    /// Sets the soft limit to `value`, unless the hard limit is already at most `value`. Returns
    /// whether the limit was changed.
    pub(super) fn lower_soft_limit(limit: Limit, value: u64) -> std::io::Result<bool> {
        let resource = match limit {
            Limit::CpuTime => Resource::CPU,
            Limit::VirtualMemory => Resource::AS,
        };

        let (_, hard) = resource.get()?;
        if hard != rlimit::INFINITY && value >= hard {
            return Ok(false);
        }

        resource.set(value, hard)?;
        Ok(true)
    }
}

#[cfg(not(unix))]
mod imp {
    #[derive(Clone, Copy, Debug)]
    pub(super) enum Limit {
        CpuTime,
        VirtualMemory,
    }

    pub(super) fn lower_soft_limit(_: Limit, _: u64) -> std::io::Result<bool> {
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "resource limits are only available on unix",
        ))
    }
}

