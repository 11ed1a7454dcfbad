//! The portfolio's fixed panels.

use super::{Badge, Card, Panel, Tone};

pub const NOT_FOUND_MESSAGE: &str = "Command not found. Type 'help' for available commands.";

pub const WELCOME_TITLE: &str = "Portfolio Terminal v2.0.0 (c) 2024";
pub const WELCOME_HINT: &str = "Type 'help' for available commands.";

pub fn not_found() -> Panel {
    Panel::new().text(NOT_FOUND_MESSAGE)
}

pub fn welcome_banner() -> Panel {
    Panel::new().text(WELCOME_TITLE).text(WELCOME_HINT)
}

/// `commands` pairs each name with its one-line description.
pub fn help(commands: &[(&str, &str)]) -> Panel {
    commands.iter().fold(
        Panel::new().heading("[Available Commands]"),
        |panel, (name, description)| panel.bullet(format!("$ {} - {}", name, description)),
    )
}

/// `last_updated` is stamped once when the registry is built, so repeated
/// `whoami` calls within a session render identical panels.
pub fn whoami(last_updated: &str) -> Panel {
    Panel::new()
        .card(
            Card::new("Charafeddine Nassiri")
                .icon("👨‍💻")
                .subtitle("Cybersecurity Specialist & CTO @ Defendis")
                .badge(Badge::new("Online", Tone::Success))
                .line("⌘ Casablanca, Morocco")
                .line("⚡ Available for collaboration"),
        )
        .field("Years of Experience", "8+")
        .field("Projects Completed", "50+")
        .field("Technologies", "15+")
        .heading("~/About")
        .text(
            "I'm Charafeddine Nassiri, a tech geek, cybersecurity aficionado, and \
             self-proclaimed AI wizard. As CTO of Defendis, I spend my days battling cyber \
             threats, cooking up smart solutions, and drinking way too much coffee. I've \
             worked with banks and businesses across Africa, helping them sleep a little \
             better at night. When I'm not geeking out over my broken code, you'll probably \
             find me trying to explain to my wife why buying another gadget is absolutely \
             necessary.",
        )
        .tags(
            Some("~/Tech Stack"),
            [
                "MISP",
                "OpenCTI",
                "TheHive",
                "Cortex",
                "YARA",
                "Sigma Rules",
                "Snort/Suricata",
                "Python",
                "STIX/TAXII",
                "Maltego",
            ],
        )
        .heading("~/Current Focus")
        .notice("Building The Next Generation of Cybersecurity Solutions")
        .footer(format!(
            "Type 'contact' or 'social' for ways to connect · Last updated: {}",
            last_updated
        ))
}

pub fn experience() -> Panel {
    Panel::new()
        .heading("[Work Experience]")
        .card(
            Card::new("Co-Founder & CTO")
                .icon("🚀")
                .subtitle("Defendis.ai")
                .period("2024 - Present")
                .badge(Badge::new("Current", Tone::Success))
                .lines([
                    "Leading technical strategy and product development",
                    "Building innovative cybersecurity solutions",
                    "Managing technical team and security operations",
                ]),
        )
        .card(
            Card::new("Purple Team Lead & Senior Analyst")
                .icon("🛡️")
                .subtitle("Dataprotect")
                .period("2021 - 2024")
                .lines([
                    "Led red and blue team operations",
                    "Conducted advanced threat hunting and incident response",
                    "Developed security strategies and frameworks",
                ]),
        )
        .card(
            Card::new("Offensive Security Consultant")
                .icon("🎯")
                .subtitle("Dataprotect")
                .period("2019 - 2021")
                .lines([
                    "Performed penetration testing and security assessments",
                    "Conducted vulnerability research and exploit development",
                ]),
        )
        .card(
            Card::new("Freelance Application Security Consultant")
                .icon("💼")
                .subtitle("Self-Employed")
                .period("2014 - 2018")
                .lines([
                    "Conducted 3000+ security tests for organizations including Fortune 500 companies",
                    "Performed full-cycle ethical hacks from test planning to reporting",
                    "Developed custom security testing methodologies and frameworks",
                ]),
        )
}

pub fn skills() -> Panel {
    Panel::new()
        .heading("[Technical Skills]")
        .card(Card::new("Offensive Security").icon("🎯").lines([
            "Penetration Testing",
            "Vulnerability Assessment",
            "Red Teaming",
            "Social Engineering",
            "Web App Security",
        ]))
        .card(Card::new("Threat Intelligence").icon("🔍").lines([
            "CTI Analysis",
            "OSINT Collection",
            "Threat Hunting",
            "IOC Development",
            "APT Tracking",
        ]))
        .card(Card::new("SOC Operations").icon("🛡️").lines([
            "Incident Response",
            "Log Analysis",
            "SIEM Management",
            "Alert Triage",
            "Malware Analysis",
        ]))
        .card(Card::new("Tools & Platforms").icon("🔧").lines([
            "MISP/OpenCTI",
            "TheHive/Cortex",
            "Splunk/ELK",
            "Nmap/Metasploit",
            "Wireshark/Zeek",
        ]))
        .notice("Currently focusing on Advanced Threat Hunting and APT Research")
}

pub fn projects() -> Panel {
    Panel::new()
        .heading("[Featured Projects]")
        .card(
            Card::new("Defendis.ai")
                .icon("🛡️")
                .subtitle("Advanced Threat Intelligence Platform | AI-Powered Cybersecurity Solutions")
                .link("https://defendis.ai")
                .badge(Badge::new("Live", Tone::Success)),
        )
        .link_preview("https://defendis.ai")
        .text(
            "A comprehensive threat intelligence platform that helps Government Agencies, \
             Banks, and Businesses identify breaches and known vulnerabilities. The platform \
             leverages AI to prioritize, contextualize, and deliver advanced cyber threat \
             insights.",
        )
        .card(
            Card::new("Credentials Compromise Alerting")
                .icon("🔐")
                .line("Automated detection and alerting for employee and customer credential compromises"),
        )
        .card(
            Card::new("Payment Cards Fraud Prevention")
                .icon("💳")
                .line("Real-time detection of payment card leaks across the dark web"),
        )
        .card(
            Card::new("Assets Vulnerability Insights")
                .icon("🎯")
                .line("Identification and prioritization of vulnerabilities based on real-time exploitability"),
        )
        .card(
            Card::new("Ransomware Monitoring")
                .icon("🚨")
                .line("Early detection of ransomware attacks targeting regional peers"),
        )
        .tags(
            Some("Key Technologies"),
            [
                "AI/ML",
                "MISP",
                "OpenCTI",
                "TheHive",
                "STIX/TAXII",
                "Python",
                "Next.js",
                "TypeScript",
            ],
        )
        .notice("Visit Platform → https://defendis.ai")
}

pub fn contact() -> Panel {
    Panel::new()
        .heading("[Contact Information]")
        .field("📧 Email", "john@example.com")
        .field("📱 Phone", "(555) 123-4567")
        .field("📍 Location", "New York, NY")
        .field("⏰ Timezone", "EST (UTC-5)")
        .notice("Available for freelance opportunities")
}

pub fn social() -> Panel {
    Panel::new()
        .heading("[Social Links]")
        .card(
            Card::new("GitHub")
                .icon("🐙")
                .subtitle("@johndoe")
                .link("https://github.com"),
        )
        .card(
            Card::new("LinkedIn")
                .icon("💼")
                .subtitle("John Doe")
                .link("https://linkedin.com"),
        )
        .card(
            Card::new("X")
                .icon("✖️")
                .subtitle("@johndoe")
                .link("https://x.com"),
        )
        .footer("Click any card to visit profile")
}
