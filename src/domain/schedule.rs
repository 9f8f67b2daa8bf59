#![allow(dead_code)]

//! The fixed four-phase timeline the whole plan hangs off.

use super::entities::{Task, TaskStatus};

/// One column of the timeline. The four phases are fixed for the season;
/// tasks reference them by id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Phase {
    pub id: &'static str,
    pub title: &'static str,
    pub dates: &'static str,
    pub icon: &'static str,
}

pub const PHASES: [Phase; 4] = [
    Phase {
        id: "p1",
        title: "Week 1: Ideation & Branding",
        dates: "Nov 18-24",
        icon: "💡",
    },
    Phase {
        id: "p2",
        title: "Week 2: Finance & Web",
        dates: "Nov 25-30",
        icon: "🧮",
    },
    Phase {
        id: "p3",
        title: "Production",
        dates: "Dec 1-10",
        icon: "🔥",
    },
    Phase {
        id: "p4",
        title: "Market Day",
        dates: "Dec 13",
        icon: "⭐",
    },
];

pub fn phase_by_id(id: &str) -> Option<&'static Phase> {
    PHASES.iter().find(|phase| phase.id == id)
}

pub fn tasks_in_phase<'a>(tasks: &'a [Task], phase_id: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|task| task.phase_id == phase_id).collect()
}

/// Fraction of tasks done, in `0.0..=1.0`. An empty list counts as zero
/// progress rather than complete.
pub fn overall_progress(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let done = tasks
        .iter()
        .filter(|task| task.status == TaskStatus::Done)
        .count();
    done as f64 / tasks.len() as f64
}

/// Progress as a whole percentage for the label next to the bar.
pub fn progress_percent(tasks: &[Task]) -> u32 {
    (overall_progress(tasks) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, phase_id: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            phase_id: phase_id.to_string(),
            title: format!("task {id}"),
            description: String::new(),
            assignee: None,
            status,
        }
    }

    #[test]
    fn phases_are_fixed_and_addressable() {
        assert_eq!(PHASES.len(), 4);
        assert!(phase_by_id("p3").is_some());
        assert!(phase_by_id("p9").is_none());
    }

    #[test]
    fn tasks_group_by_phase() {
        let tasks = vec![
            task("1", "p1", TaskStatus::Todo),
            task("2", "p2", TaskStatus::Todo),
            task("3", "p1", TaskStatus::Done),
        ];
        let in_p1 = tasks_in_phase(&tasks, "p1");
        assert_eq!(in_p1.len(), 2);
        assert!(in_p1.iter().all(|t| t.phase_id == "p1"));
    }

    #[test]
    fn empty_timeline_has_zero_progress() {
        assert_eq!(overall_progress(&[]), 0.0);
        assert_eq!(progress_percent(&[]), 0);
    }

    #[test]
    fn progress_counts_done_over_total() {
        let tasks = vec![
            task("1", "p1", TaskStatus::Done),
            task("2", "p1", TaskStatus::Todo),
            task("3", "p2", TaskStatus::Done),
        ];
        assert!((overall_progress(&tasks) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(progress_percent(&tasks), 67);
    }
}
