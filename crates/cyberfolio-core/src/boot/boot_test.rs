use std::time::Duration;

use tokio::sync::mpsc;

use super::*;

fn short_lines() -> Vec<BootLine> {
    vec![
        BootLine {
            text: "one",
            delay_ms: 100,
        },
        BootLine {
            text: "two",
            delay_ms: 0,
        },
        BootLine {
            text: "three",
            delay_ms: 250,
        },
    ]
}

#[test]
fn it_sums_fixed_and_per_line_delays() {
    let sequencer = BootSequencer::default();
    assert_eq!(BOOT_LINES.len(), 18);
    assert_eq!(sequencer.total_duration(), Duration::from_millis(10_950));

    let custom = BootSequencer::new(short_lines(), BootTimings::default());
    assert_eq!(
        custom.total_duration(),
        Duration::from_millis(1000 + 2000 + 1500 + 100 + 0 + 250 + 500)
    );
}

#[test]
fn it_schedules_phases_in_strictly_increasing_order() {
    let sequencer = BootSequencer::new(short_lines(), BootTimings::default());
    let schedule = sequencer.schedule();

    let phases: Vec<BootPhase> = schedule.iter().map(|(_, phase)| *phase).collect();
    assert_eq!(
        phases,
        vec![
            BootPhase::Post,
            BootPhase::MemoryTest,
            BootPhase::BootLine(0),
            BootPhase::BootLine(1),
            BootPhase::BootLine(2),
            BootPhase::Done,
        ]
    );
    assert!(phases.windows(2).all(|pair| pair[0] < pair[1]));

    let waits: Vec<u64> = schedule
        .iter()
        .map(|(wait, _)| wait.as_millis() as u64)
        .collect();
    assert_eq!(waits, vec![1000, 2000, 1600, 0, 250, 500]);
}

#[test]
fn it_reveals_exactly_the_first_lines() {
    let lines = short_lines();
    assert!(BootPhase::PrePost.revealed(&lines).is_empty());
    assert!(BootPhase::MemoryTest.revealed(&lines).is_empty());
    assert!(BootPhase::Done.revealed(&lines).is_empty());

    let texts: Vec<&str> = BootPhase::BootLine(1)
        .revealed(&lines)
        .iter()
        .map(|line| line.text)
        .collect();
    assert_eq!(texts, vec!["one", "two"]);

    // An out-of-range cursor never panics.
    assert_eq!(BootPhase::BootLine(10).revealed(&lines).len(), 3);
}

#[test]
fn it_scales_waits_with_speedup() {
    let timings = BootTimings::default().with_speedup(10);
    let sequencer = BootSequencer::new(BOOT_LINES.to_vec(), timings);
    assert_eq!(sequencer.total_duration(), Duration::from_millis(1095));

    let zero = BootTimings::default().with_speedup(0);
    assert_eq!(zero.speedup, 1);
}

#[tokio::test(start_paused = true)]
async fn it_terminates_in_done_after_the_total_duration() {
    let sequencer = BootSequencer::default();
    let total = sequencer.total_duration();
    let start = tokio::time::Instant::now();

    let mut seen: Vec<(BootPhase, Vec<&'static str>)> = Vec::new();
    let last = sequencer
        .run(|phase, revealed| {
            seen.push((phase, revealed.iter().map(|line| line.text).collect()));
        })
        .await;

    let elapsed = start.elapsed();
    assert_eq!(last, BootPhase::Done);
    assert!(elapsed >= total, "finished early: {:?}", elapsed);
    assert!(elapsed < total + Duration::from_millis(50), "finished late: {:?}", elapsed);

    assert_eq!(seen.first().map(|(phase, _)| *phase), Some(BootPhase::PrePost));
    assert_eq!(seen.last().map(|(phase, _)| *phase), Some(BootPhase::Done));
    assert_eq!(seen.len(), BOOT_LINES.len() + 4);

    for (phase, revealed) in &seen {
        if let BootPhase::BootLine(i) = phase {
            let expected: Vec<&str> = BOOT_LINES[..=*i].iter().map(|line| line.text).collect();
            assert_eq!(revealed, &expected);
        }
    }
}

#[tokio::test(start_paused = true)]
async fn it_publishes_phases_on_a_channel() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let sequencer = BootSequencer::new(short_lines(), BootTimings::default());

    let last = sequencer.run_into(tx).await;
    assert!(last.is_done());

    let mut phases = Vec::new();
    while let Ok(phase) = rx.try_recv() {
        phases.push(phase);
    }
    assert_eq!(phases.len(), 7);
    assert!(phases.windows(2).all(|pair| pair[0] < pair[1]));
}
