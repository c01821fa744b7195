//! Journey progress - completion, badges and greeting for one student

use serde::Serialize;

use crate::model::StudentView;

/// Percentage credited per logged internship
const PERCENT_PER_INTERNSHIP: usize = 10;

/// Achievement badges awarded from a student's internships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    /// At least one internship
    FirstInternship,
    /// Three or more internships
    InternshipPro,
    /// Five or more small businesses digitalized in total
    TopPerformer,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::FirstInternship => "Badge: First Internship Completed!",
            Badge::InternshipPro => "Badge: Internship Pro!",
            Badge::TopPerformer => "Badge: Top Performer!",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Badge::FirstInternship => "🎉",
            Badge::InternshipPro => "🚀",
            Badge::TopPerformer => "🏆",
        }
    }
}

/// Progress summary derived from a `StudentView`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub internships: usize,
    pub total_msmes: u64,
    /// 0-100
    pub completion_percent: u8,
    pub badges: Vec<Badge>,
}

impl Progress {
    pub fn for_student(view: &StudentView) -> Self {
        let internships = view.internships.len();
        let total_msmes = view.total_msmes();
        let completion_percent = internships.saturating_mul(PERCENT_PER_INTERNSHIP).min(100) as u8;

        let mut badges = Vec::new();
        if internships >= 1 {
            badges.push(Badge::FirstInternship);
        }
        if internships >= 3 {
            badges.push(Badge::InternshipPro);
        }
        if total_msmes >= 5 {
            badges.push(Badge::TopPerformer);
        }

        Self {
            internships,
            total_msmes,
            completion_percent,
            badges,
        }
    }
}

/// Sidebar-style greeting for a student
pub fn greeting(view: &StudentView) -> String {
    let count = view.internships.len();
    let message = match count {
        0 => "You're just starting! Log your first internship!".to_string(),
        1 => "Wow, 1 internship! Keep it up!".to_string(),
        n => format!("Wow, {} internships! Keep it up!", n),
    };
    format!("Hi {}! {}", view.name, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InternshipSummary;

    fn view(counts: &[u32]) -> StudentView {
        StudentView {
            student_id: 1,
            name: "Asha".to_string(),
            email: "a@x.com".to_string(),
            internships: counts
                .iter()
                .map(|&c| InternshipSummary {
                    company_name: "Acme".to_string(),
                    duration: "3 months".to_string(),
                    feedback: None,
                    msme_digitalized: c,
                })
                .collect(),
        }
    }

    #[test]
    fn test_no_internships() {
        let progress = Progress::for_student(&view(&[]));
        assert_eq!(progress.completion_percent, 0);
        assert!(progress.badges.is_empty());
        assert_eq!(greeting(&view(&[])), "Hi Asha! You're just starting! Log your first internship!");
    }

    #[test]
    fn test_badges_accumulate() {
        let one = Progress::for_student(&view(&[2]));
        assert_eq!(one.badges, vec![Badge::FirstInternship]);
        assert_eq!(greeting(&view(&[2])), "Hi Asha! Wow, 1 internship! Keep it up!");

        let three = Progress::for_student(&view(&[1, 1, 3]));
        assert_eq!(three.completion_percent, 30);
        assert_eq!(
            three.badges,
            vec![Badge::FirstInternship, Badge::InternshipPro, Badge::TopPerformer]
        );
        assert_eq!(greeting(&view(&[1, 1, 3])), "Hi Asha! Wow, 3 internships! Keep it up!");
    }

    #[test]
    fn test_completion_caps_at_100() {
        let progress = Progress::for_student(&view(&[0; 14]));
        assert_eq!(progress.completion_percent, 100);
        assert!(!progress.badges.contains(&Badge::TopPerformer));
    }
}
