//! Pure scoring heuristics over days-until-start.
//!
//! Kept free of clock and file access so the arithmetic is testable on its
//! own; callers supply `days_until_start` from the roster row and today's
//! date.

/// Urgency of one checklist task given its remaining slack in days.
#[must_use]
pub fn task_status(due_in: i64) -> &'static str {
    if due_in < 0 {
        "OVERDUE"
    } else if due_in <= 3 {
        "URGENT"
    } else {
        "UPCOMING"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readiness {
    pub score: i64,
    pub label: &'static str,
    pub blockers: Vec<&'static str>,
}

/// Day-1 readiness: start at 100, subtract for start-date proximity.
/// Both penalties apply when the start date has already passed.
#[must_use]
pub fn readiness(days_until_start: i64) -> Readiness {
    let mut score = 100;
    let mut blockers = Vec::new();

    if days_until_start < 3 {
        score -= 30;
        blockers.push("Very little time before start date");
    }

    if days_until_start < 0 {
        score -= 50;
        blockers.push("Start date already passed");
    }

    let label = if score >= 70 {
        "READY"
    } else if score >= 40 {
        "AT RISK"
    } else {
        "NOT READY"
    };

    Readiness {
        score,
        label,
        blockers,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Risk {
    pub score: i64,
    pub level: &'static str,
}

/// Onboarding-delay risk: start-date proximity plus a contract-hire bump.
#[must_use]
pub fn risk(days_until_start: i64, employment_type: &str) -> Risk {
    let mut score = 0;

    if days_until_start <= 7 {
        score += 40;
    } else if days_until_start <= 14 {
        score += 20;
    }

    if employment_type.eq_ignore_ascii_case("contract") {
        score += 10;
    }

    let level = if score >= 50 {
        "HIGH"
    } else if score >= 25 {
        "MEDIUM"
    } else {
        "LOW"
    };

    Risk { score, level }
}
