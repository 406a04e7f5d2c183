use crate::system::{CpuInfo, DiskReport, DiskSort, MemoryInfo, SwapInfo, SystemInfo};

pub fn system(color: bool) {
    SystemInfo::capture().print(color);
}

pub fn cpu(color: bool) {
    CpuInfo::capture().print(color);
}

pub fn memory(color: bool) {
    MemoryInfo::capture().print(color);
}

pub fn swap(color: bool) {
    SwapInfo::capture().print(color);
}

pub fn disk(all: bool, sort: Option<DiskSort>, total: bool, color: bool) {
    let mut report = DiskReport::capture();
    if let Some(sort) = sort {
        report.sort_by(sort);
    }
    log::debug!("{} disk(s) found", report.disks.len());
    print!("{}", report.table(all, total).render(color));
}
