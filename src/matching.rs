//! Match review table for the admin matching screen.
//!
//! Proposals come from a fixed, hand-scored fixture. There is no
//! compatibility model behind the scores.

use serde::Serialize;

use crate::error::MatchError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub id: &'static str,
    pub name: &'static str,
    pub email: &'static str,
    pub current_company: &'static str,
    pub job_role: &'static str,
    pub skills: &'static str,
    pub academic_bg: &'static str,
    pub skills_gap: Option<&'static str>,
    pub aspirations: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        if score < 5.0 {
            ScoreBand::Low
        } else if score < 7.0 {
            ScoreBand::Medium
        } else {
            ScoreBand::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchProposal {
    pub id: &'static str,
    pub mentor: Profile,
    pub mentee: Profile,
    pub compatibility_score: f64,
    pub approved: bool,
}

impl MatchProposal {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_score(self.compatibility_score)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchReview {
    proposals: Vec<MatchProposal>,
}

impl MatchReview {
    /// Loads the fixture, lowest score first.
    pub fn generate() -> Self {
        let mentees = mentees();
        let mentors = mentors();
        let table = [
            ("match-1", 0, 0, 8.5),
            ("match-2", 2, 0, 9.2),
            ("match-3", 1, 1, 7.8),
            ("match-4", 5, 1, 6.3),
            ("match-5", 3, 2, 4.2),
            ("match-6", 4, 2, 7.1),
        ];

        let mut proposals: Vec<MatchProposal> = table
            .iter()
            .map(|&(id, mentee, mentor, score)| MatchProposal {
                id,
                mentor: mentors[mentor].clone(),
                mentee: mentees[mentee].clone(),
                compatibility_score: score,
                approved: false,
            })
            .collect();
        proposals.sort_by(|a, b| a.compatibility_score.total_cmp(&b.compatibility_score));

        Self { proposals }
    }

    pub fn proposals(&self) -> &[MatchProposal] {
        &self.proposals
    }

    pub fn approve(&mut self, id: &str) -> Result<(), MatchError> {
        let proposal = self
            .proposals
            .iter_mut()
            .find(|proposal| proposal.id == id)
            .ok_or_else(|| MatchError::UnknownProposal(id.to_string()))?;
        proposal.approved = true;
        Ok(())
    }

    pub fn approve_all(&mut self) {
        for proposal in &mut self.proposals {
            proposal.approved = true;
        }
    }

    pub fn pending_count(&self) -> usize {
        self.proposals.iter().filter(|p| !p.approved).count()
    }
}

fn mentees() -> Vec<Profile> {
    vec![
        Profile {
            id: "mentee-1",
            name: "Alice Chen",
            email: "alice.chen@mit.edu",
            current_company: "Student",
            job_role: "Computer Science Student",
            skills: "Python, Java, Data Structures",
            academic_bg: "Computer Science, MIT",
            skills_gap: Some("System Design, Machine Learning"),
            aspirations: Some("Software Engineering at FAANG"),
        },
        Profile {
            id: "mentee-2",
            name: "Marcus Rodriguez",
            email: "marcus.r@stanford.edu",
            current_company: "Student",
            job_role: "CS & Business Student",
            skills: "JavaScript, React, SQL",
            academic_bg: "Computer Science & Business, Stanford",
            skills_gap: Some("Backend Development, Cloud Computing"),
            aspirations: Some("Tech Startup Founder"),
        },
        Profile {
            id: "mentee-3",
            name: "Priya Patel",
            email: "priya.p@berkeley.edu",
            current_company: "Student",
            job_role: "Data Science Student",
            skills: "Python, R, Statistics, SQL",
            academic_bg: "Data Science, UC Berkeley",
            skills_gap: Some("Machine Learning Engineering, MLOps"),
            aspirations: Some("AI/ML Engineer"),
        },
        Profile {
            id: "mentee-4",
            name: "David Kim",
            email: "david.kim@cmu.edu",
            current_company: "Student",
            job_role: "Software Engineering Student",
            skills: "C++, Python, Algorithms",
            academic_bg: "Software Engineering, CMU",
            skills_gap: Some("Distributed Systems, DevOps"),
            aspirations: Some("Senior Software Engineer"),
        },
        Profile {
            id: "mentee-5",
            name: "Sarah Wilson",
            email: "sarah.w@caltech.edu",
            current_company: "Student",
            job_role: "Computer Engineering Student",
            skills: "Java, C, Hardware Design",
            academic_bg: "Computer Engineering, Caltech",
            skills_gap: Some("Software Architecture, Leadership"),
            aspirations: Some("Technical Lead"),
        },
        Profile {
            id: "mentee-6",
            name: "Alex Thompson",
            email: "alex.t@ucla.edu",
            current_company: "Student",
            job_role: "CS & Math Student",
            skills: "Python, MATLAB, Algorithms",
            academic_bg: "Computer Science & Mathematics, UCLA",
            skills_gap: Some("Web Development, Project Management"),
            aspirations: Some("Full Stack Developer"),
        },
    ]
}

fn mentors() -> Vec<Profile> {
    vec![
        Profile {
            id: "mentor-1",
            name: "Dr. Sarah Johnson",
            email: "sarah.johnson@google.com",
            current_company: "Google",
            job_role: "Senior Software Engineer",
            skills: "System Design, Python, Leadership, Machine Learning",
            academic_bg: "PhD Computer Science, Stanford",
            skills_gap: None,
            aspirations: None,
        },
        Profile {
            id: "mentor-2",
            name: "Michael Chen",
            email: "michael.chen@meta.com",
            current_company: "Meta",
            job_role: "Engineering Manager",
            skills: "Full Stack Development, Team Leadership, React, Node.js",
            academic_bg: "MS Computer Science, MIT",
            skills_gap: None,
            aspirations: None,
        },
        Profile {
            id: "mentor-3",
            name: "Jennifer Liu",
            email: "jennifer.liu@amazon.com",
            current_company: "Amazon",
            job_role: "Principal Engineer",
            skills: "Distributed Systems, Cloud Architecture, Java, DevOps",
            academic_bg: "MS Software Engineering, Carnegie Mellon",
            skills_gap: None,
            aspirations: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proposals_are_sorted_lowest_score_first() {
        let review = MatchReview::generate();
        let ids: Vec<&str> = review.proposals().iter().map(|p| p.id).collect();
        assert_eq!(
            ids,
            vec!["match-5", "match-4", "match-6", "match-3", "match-1", "match-2"]
        );
        assert_eq!(review.proposals()[0].mentee.name, "David Kim");
        assert_eq!(review.proposals()[0].mentor.name, "Jennifer Liu");
    }

    #[test]
    fn bands_follow_score_thresholds() {
        assert_eq!(ScoreBand::for_score(4.2), ScoreBand::Low);
        assert_eq!(ScoreBand::for_score(5.0), ScoreBand::Medium);
        assert_eq!(ScoreBand::for_score(6.9), ScoreBand::Medium);
        assert_eq!(ScoreBand::for_score(7.0), ScoreBand::High);
    }

    #[test]
    fn approving_marks_single_or_all() {
        let mut review = MatchReview::generate();
        assert_eq!(review.pending_count(), 6);

        review.approve("match-3").unwrap();
        assert_eq!(review.pending_count(), 5);
        assert_eq!(
            review.approve("match-9"),
            Err(MatchError::UnknownProposal("match-9".to_string()))
        );

        review.approve_all();
        assert_eq!(review.pending_count(), 0);
    }
}
