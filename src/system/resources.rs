//! Point-in-time readings of the machine's resources, taken through `sysinfo`.
//!
//! Every report is a plain value: `capture()` queries the OS once and the
//! rendering methods only format what was read.

use crate::utils::{Column, PrettySize, Table};
use clap::ValueEnum;
use colored::{Color, Colorize};
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;
use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, RefreshKind, System};

const UNKNOWN: &str = "unknown";

/// Share of `part` in `whole`, as a percentage; 0 when `whole` is 0
fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub name: Option<String>,
    pub kernel_version: Option<String>,
    pub os_version: Option<String>,
    pub host_name: Option<String>,
}

impl SystemInfo {
    pub fn capture() -> Self {
        Self {
            name: System::name(),
            kernel_version: System::kernel_version(),
            os_version: System::os_version(),
            host_name: System::host_name(),
        }
    }

    fn fields(&self) -> [(&'static str, Option<&str>, Color); 4] {
        [
            ("name:          ", self.name.as_deref(), Color::Blue),
            ("kernel version:", self.kernel_version.as_deref(), Color::Cyan),
            ("OS version:    ", self.os_version.as_deref(), Color::Green),
            ("host name:     ", self.host_name.as_deref(), Color::Magenta),
        ]
    }

    pub fn print(&self, color: bool) {
        if !color {
            print!("{}", self);
            return;
        }

        for (label, value, value_color) in self.fields() {
            let value = match value {
                Some(value) => value.color(value_color),
                None => UNKNOWN.yellow(),
            };
            println!("{} {} {}", "System".red(), label, value);
        }
    }
}

impl fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value, _) in self.fields() {
            writeln!(f, "System {} {}", label, value.unwrap_or(UNKNOWN))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoreInfo {
    pub name: String,
    pub usage: f32,
    /// MHz
    pub frequency: u64,
    pub vendor_id: String,
    pub brand: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CpuInfo {
    /// Average usage across all logical cores
    pub usage: f32,
    pub physical_cores: Option<usize>,
    pub cores: Vec<CoreInfo>,
}

impl CpuInfo {
    /// Blocks for `sysinfo::MINIMUM_CPU_UPDATE_INTERVAL`; usage needs two samples
    pub fn capture() -> Self {
        let mut system = System::new_with_specifics(
            RefreshKind::new().with_cpu(CpuRefreshKind::everything()),
        );
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        system.refresh_cpu();

        let cores = system
            .cpus()
            .iter()
            .map(|cpu| CoreInfo {
                name: cpu.name().to_string(),
                usage: cpu.cpu_usage(),
                frequency: cpu.frequency(),
                vendor_id: cpu.vendor_id().to_string(),
                brand: cpu.brand().to_string(),
            })
            .collect();

        Self {
            usage: system.global_cpu_info().cpu_usage(),
            physical_cores: system.physical_core_count(),
            cores,
        }
    }

    /// Logical cores
    pub fn threads(&self) -> usize {
        self.cores.len()
    }

    fn physical_cores_text(&self) -> String {
        self.physical_cores
            .map_or_else(|| UNKNOWN.to_string(), |n| n.to_string())
    }

    pub fn print(&self, color: bool) {
        if !color {
            print!("{}", self);
            return;
        }

        println!(
            "{} UsedPercent: {}, Core: {}, Thread: {}",
            "Cpu".red(),
            format_percent(self.usage.into()).blue(),
            self.physical_cores_text().cyan(),
            self.threads().to_string().green()
        );
        for core in &self.cores {
            println!(
                "{} {} {} {} {}",
                core.name.yellow(),
                format_percent(core.usage.into()).blue(),
                format!("{}MHz", core.frequency).cyan(),
                core.vendor_id.green(),
                core.brand.magenta()
            );
        }
    }
}

impl fmt::Display for CpuInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Cpu UsedPercent: {}, Core: {}, Thread: {}",
            format_percent(self.usage.into()),
            self.physical_cores_text(),
            self.threads()
        )?;
        for core in &self.cores {
            writeln!(
                f,
                "{} {} {}MHz {} {}",
                core.name,
                format_percent(core.usage.into()),
                core.frequency,
                core.vendor_id,
                core.brand
            )?;
        }
        Ok(())
    }
}

/// RAM in bytes.
///
/// "free" is memory nothing has claimed, "available" is what could be handed
/// out again. Windows and FreeBSD don't tell them apart and report the same
/// number for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryInfo {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub available: u64,
}

impl MemoryInfo {
    pub fn capture() -> Self {
        let system = System::new_with_specifics(
            RefreshKind::new().with_memory(MemoryRefreshKind::new().with_ram()),
        );
        Self {
            total: system.total_memory(),
            used: system.used_memory(),
            free: system.free_memory(),
            available: system.available_memory(),
        }
    }

    pub fn used_percent(&self) -> f64 {
        percent(self.used, self.total)
    }

    pub fn print(&self, color: bool) {
        if !color {
            print!("{}", self);
            return;
        }

        println!(
            "{} Total: {}, Used: {}, Free: {}, Available: {}, UsedPercent: {}",
            "Memory".red(),
            self.total.pretty_size().blue(),
            self.used.pretty_size().cyan(),
            self.free.pretty_size().green(),
            self.available.pretty_size().yellow(),
            format_percent(self.used_percent()).magenta()
        );
    }
}

impl fmt::Display for MemoryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Memory Total: {}, Used: {}, Free: {}, Available: {}, UsedPercent: {}",
            self.total.pretty_size(),
            self.used.pretty_size(),
            self.free.pretty_size(),
            self.available.pretty_size(),
            format_percent(self.used_percent())
        )
    }
}

/// Swap in bytes; all zero on hosts without swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapInfo {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

impl SwapInfo {
    pub fn capture() -> Self {
        let system = System::new_with_specifics(
            RefreshKind::new().with_memory(MemoryRefreshKind::new().with_swap()),
        );
        Self {
            total: system.total_swap(),
            used: system.used_swap(),
            free: system.free_swap(),
        }
    }

    pub fn used_percent(&self) -> f64 {
        percent(self.used, self.total)
    }

    pub fn print(&self, color: bool) {
        if !color {
            print!("{}", self);
            return;
        }

        println!(
            "{} Total: {}, Used: {}, Free: {}, UsedPercent: {}",
            "Swap".red(),
            self.total.pretty_size().blue(),
            self.used.pretty_size().cyan(),
            self.free.pretty_size().green(),
            format_percent(self.used_percent()).magenta()
        );
    }
}

impl fmt::Display for SwapInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Swap Total: {}, Used: {}, Free: {}, UsedPercent: {}",
            self.total.pretty_size(),
            self.used.pretty_size(),
            self.free.pretty_size(),
            format_percent(self.used_percent())
        )
    }
}

/// Column a disk table can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DiskSort {
    Name,
    Mount,
    Total,
    Available,
    Used,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskInfo {
    pub name: String,
    /// HDD, SSD or unknown
    pub kind: String,
    pub file_system: String,
    pub mount_point: PathBuf,
    pub total: u64,
    pub available: u64,
    pub removable: bool,
}

impl DiskInfo {
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.available)
    }

    pub fn used_percent(&self) -> f64 {
        percent(self.used(), self.total)
    }

    fn compare(&self, other: &Self, sort: DiskSort) -> Ordering {
        match sort {
            DiskSort::Name => self.name.cmp(&other.name),
            DiskSort::Mount => self.mount_point.cmp(&other.mount_point),
            DiskSort::Total => self.total.cmp(&other.total),
            DiskSort::Available => self.available.cmp(&other.available),
            DiskSort::Used => self.used().cmp(&other.used()),
        }
    }
}

/// Sums over every listed disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskTotals {
    pub total: u64,
    pub available: u64,
    pub used: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskReport {
    pub disks: Vec<DiskInfo>,
}

impl DiskReport {
    pub fn capture() -> Self {
        let disks = Disks::new_with_refreshed_list();
        let disks = disks
            .list()
            .iter()
            .map(|disk| DiskInfo {
                name: disk.name().to_string_lossy().into_owned(),
                kind: disk.kind().to_string(),
                file_system: disk.file_system().to_string_lossy().into_owned(),
                mount_point: disk.mount_point().to_path_buf(),
                total: disk.total_space(),
                available: disk.available_space(),
                removable: disk.is_removable(),
            })
            .collect();

        Self { disks }
    }

    /// Ascending; ties keep mount point order
    pub fn sort_by(&mut self, sort: DiskSort) {
        self.disks.sort_by(|a, b| {
            a.compare(b, sort)
                .then_with(|| a.mount_point.cmp(&b.mount_point))
        });
    }

    pub fn totals(&self) -> DiskTotals {
        self.disks.iter().fold(DiskTotals::default(), |acc, disk| DiskTotals {
            total: acc.total + disk.total,
            available: acc.available + disk.available,
            used: acc.used + disk.used(),
        })
    }

    /// `all` adds file system, kind and removable columns; `with_totals`
    /// appends a summed row
    pub fn table(&self, all: bool, with_totals: bool) -> Table {
        let mut columns = vec![Column::left("Name").color(Color::Yellow)];
        if all {
            columns.extend([
                Column::left("Type"),
                Column::left("Kind"),
                Column::left("Removable"),
            ]);
        }
        columns.extend([
            Column::right("Size").color(Color::Blue),
            Column::right("Used").color(Color::Cyan),
            Column::right("Avail").color(Color::Green),
            Column::right("Use%").color(Color::Magenta),
            Column::left("Mounted on"),
        ]);

        let mut table = Table::new(columns);
        for disk in &self.disks {
            let mut row = vec![disk.name.clone()];
            if all {
                row.extend([
                    disk.file_system.clone(),
                    disk.kind.clone(),
                    disk.removable.to_string(),
                ]);
            }
            row.extend([
                disk.total.pretty_size(),
                disk.used().pretty_size(),
                disk.available.pretty_size(),
                format_percent(disk.used_percent()),
                disk.mount_point.display().to_string(),
            ]);
            table.push_row(row);
        }

        if with_totals {
            let totals = self.totals();
            let mut row = vec!["total".to_string()];
            if all {
                row.extend([String::new(), String::new(), String::new()]);
            }
            row.extend([
                totals.total.pretty_size(),
                totals.used.pretty_size(),
                totals.available.pretty_size(),
                format_percent(percent(totals.used, totals.total)),
                "-".to_string(),
            ]);
            table.push_row(row);
        }

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1 << 30;

    fn disk(name: &str, mount: &str, total: u64, available: u64) -> DiskInfo {
        DiskInfo {
            name: name.into(),
            kind: "SSD".into(),
            file_system: "ext4".into(),
            mount_point: PathBuf::from(mount),
            total,
            available,
            removable: false,
        }
    }

    fn report() -> DiskReport {
        DiskReport {
            disks: vec![
                disk("sdb1", "/data", 100 * GIB, 90 * GIB),
                disk("sda1", "/", 50 * GIB, 10 * GIB),
            ],
        }
    }

    #[test]
    fn host_without_swap_reports_zero_percent() {
        let swap = SwapInfo {
            total: 0,
            used: 0,
            free: 0,
        };

        assert_eq!(swap.used_percent(), 0.0);
        assert_eq!(
            swap.to_string(),
            "Swap Total: 0B, Used: 0B, Free: 0B, UsedPercent: 0.00%\n"
        );
    }

    #[test]
    fn memory_line_uses_pretty_sizes() {
        let memory = MemoryInfo {
            total: 16 * GIB,
            used: 4 * GIB,
            free: 8 * GIB,
            available: 12 * GIB,
        };

        assert_eq!(memory.used_percent(), 25.0);
        assert_eq!(
            memory.to_string(),
            "Memory Total: 16.00G, Used: 4.00G, Free: 8.00G, Available: 12.00G, UsedPercent: 25.00%\n"
        );
    }

    #[test]
    fn system_info_marks_missing_fields() {
        let info = SystemInfo {
            name: Some("Ubuntu".into()),
            kernel_version: Some("6.8.0".into()),
            os_version: None,
            host_name: Some("devbox".into()),
        };

        assert_eq!(
            info.to_string(),
            "System name:           Ubuntu\n\
             System kernel version: 6.8.0\n\
             System OS version:     unknown\n\
             System host name:      devbox\n"
        );
    }

    #[test]
    fn cpu_summary_counts_logical_cores() {
        let core = CoreInfo {
            name: "cpu0".into(),
            usage: 12.5,
            frequency: 2400,
            vendor_id: "GenuineIntel".into(),
            brand: "Xeon".into(),
        };
        let cpu = CpuInfo {
            usage: 12.5,
            physical_cores: None,
            cores: vec![core.clone(), CoreInfo { name: "cpu1".into(), ..core }],
        };

        assert_eq!(cpu.threads(), 2);
        let rendered = cpu.to_string();
        assert!(rendered.starts_with("Cpu UsedPercent: 12.50%, Core: unknown, Thread: 2\n"));
        assert!(rendered.contains("cpu1 12.50% 2400MHz GenuineIntel Xeon\n"));
    }

    #[test]
    fn used_space_never_underflows() {
        let odd = disk("loop0", "/snap", 10, 20);
        assert_eq!(odd.used(), 0);
        assert_eq!(disk("empty", "/e", 0, 0).used_percent(), 0.0);
    }

    #[test]
    fn sorts_ascending_by_the_chosen_column() {
        let mut report = report();

        report.sort_by(DiskSort::Name);
        assert_eq!(report.disks[0].name, "sda1");

        report.sort_by(DiskSort::Used);
        assert_eq!(report.disks[0].name, "sdb1");

        report.sort_by(DiskSort::Total);
        assert_eq!(report.disks[0].name, "sda1");

        report.sort_by(DiskSort::Available);
        assert_eq!(report.disks[0].name, "sda1");

        report.sort_by(DiskSort::Mount);
        assert_eq!(report.disks[0].mount_point, PathBuf::from("/"));
    }

    #[test]
    fn totals_sum_every_disk() {
        let totals = report().totals();
        assert_eq!(
            totals,
            DiskTotals {
                total: 150 * GIB,
                available: 100 * GIB,
                used: 50 * GIB,
            }
        );
    }

    #[test]
    fn table_lists_disks_then_totals() {
        let rendered = report().table(false, true).to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Name"));
        assert!(lines[0].ends_with("Mounted on"));
        assert!(lines[1].starts_with("sdb1"));
        assert!(lines[1].ends_with("10.00% /data"));
        assert!(lines[3].starts_with("total"));
        assert!(lines[3].contains("150.00G"));
        assert!(lines[3].ends_with("33.33% -"));
    }

    #[test]
    fn all_columns_include_file_system() {
        let rendered = report().table(true, false).to_string();
        let header = rendered.lines().next().unwrap_or_default();

        assert!(header.contains("Type"));
        assert!(header.contains("Removable"));
        assert!(rendered.contains("ext4"));
        assert_eq!(rendered.lines().count(), 3);
    }

    #[test]
    fn captures_memory_from_the_host() {
        let memory = MemoryInfo::capture();
        assert!(memory.used <= memory.total);
    }
}
