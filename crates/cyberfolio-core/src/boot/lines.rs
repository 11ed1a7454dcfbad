use super::BootLine;

pub const BOOT_LINES: &[BootLine] = &[
    BootLine {
        text: "[    0.000000] Linux version 6.4.0-portfolio (root@portfolio)",
        delay_ms: 300,
    },
    BootLine {
        text: "[    0.000000] Command line: BOOT_IMAGE=/boot/portfolio-kernel root=UUID=portfolio-id",
        delay_ms: 200,
    },
    BootLine {
        text: "[    0.000000] x86/fpu: Supporting XSAVE feature 0x001: 'x87 floating point registers'",
        delay_ms: 100,
    },
    BootLine {
        text: "[    0.000000] BIOS-provided physical RAM map:",
        delay_ms: 200,
    },
    BootLine {
        text: "[    0.000000] ACPI: Early table checksum verification disabled",
        delay_ms: 150,
    },
    BootLine {
        text: "[    0.000000] ACPI: RSDP 0x00000000000F0490 000024 (v02 PORTFOLIO)",
        delay_ms: 100,
    },
    BootLine {
        text: "[    0.041891] CPU0: Intel(R) Core(TM) i7-1165G7 @ 2.80GHz",
        delay_ms: 300,
    },
    BootLine {
        text: "[    0.041891] Performance Events: PEBS fmt3+",
        delay_ms: 200,
    },
    BootLine {
        text: "[    0.042345] checking TSC synchronization [CPU#0 -> CPU#1]",
        delay_ms: 400,
    },
    BootLine {
        text: "[    0.043012] Calibrating delay loop (skipped)",
        delay_ms: 300,
    },
    BootLine {
        text: "[    0.089123] Memory: 16384MB DDR4",
        delay_ms: 200,
    },
    BootLine {
        text: "[    0.091123] Initializing system services...",
        delay_ms: 800,
    },
    BootLine {
        text: "[    0.092123] Starting network interfaces...",
        delay_ms: 400,
    },
    BootLine {
        text: "[    0.093123] Loading security modules...",
        delay_ms: 300,
    },
    BootLine {
        text: "[    0.094123] Mounting filesystems...",
        delay_ms: 500,
    },
    BootLine {
        text: "[    0.095123] Starting portfolio services...",
        delay_ms: 600,
    },
    BootLine {
        text: "[    0.096123] System initialization complete.",
        delay_ms: 400,
    },
    BootLine {
        text: "Portfolio Terminal v2.0.0 (c) 2024\nType 'help' for available commands.\n",
        delay_ms: 500,
    },
];

/// Banner drawn on the POST screen.
pub const POST_BANNER: &[&str] = &[
    "Portfolio BIOS (c) 2024 Portfolio Inc.",
    "BIOS Date: 01/01/24 Ver: 2.0.0",
    "CPU: Intel(R) Core(TM) i7 @ 2.80GHz",
    "",
    "Press DEL to enter SETUP",
];

pub const MEMORY_TEST_SIZE: &str = "16384MB";
