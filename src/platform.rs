use chrono::Duration;
use crate::assignment::{
    Assignment, AssignmentDraft, AssignmentKind, AssignmentStatus, AssignmentUpdate, Difficulty,
    Tags,
};
use crate::clock::{Clock, IdSource, RecordId};
use crate::collaboration::{Collaboration, CollaborationDraft};
use crate::error::Result;
use crate::notification::{Notification, NotificationDraft, NotificationKind};
use crate::submission::{Submission, SubmissionDraft};

/// In-memory course data for one process. Every collection is kept
/// most-recent-first; new records are prepended.
#[derive(Debug)]
pub struct PlatformStore<C> {
    clock: C,
    ids: IdSource,
    default_total_students: u32,
    assignments: Vec<Assignment>,
    submissions: Vec<Submission>,
    collaborations: Vec<Collaboration>,
    notifications: Vec<Notification>,
}

impl<C: Clock> PlatformStore<C> {
    /// A store holding the demo course: three assignments and three
    /// notifications, dated relative to the clock's current reading.
    pub fn new(clock: C, default_total_students: u32) -> PlatformStore<C> {
        let mut store = PlatformStore::empty(clock, default_total_students);
        store.seed();
        store
    }

    pub fn empty(clock: C, default_total_students: u32) -> PlatformStore<C> {
        PlatformStore {
            clock,
            ids: IdSource::new(),
            default_total_students,
            assignments: vec![],
            submissions: vec![],
            collaborations: vec![],
            notifications: vec![],
        }
    }

    fn seed(&mut self) {
        let now = self.clock.now();
        let seed_assignment = |id: RecordId,
                               title: &str,
                               description: &str,
                               due_in_days: i64,
                               kind: AssignmentKind,
                               points: u32,
                               difficulty: Difficulty,
                               tags: &[&str],
                               professor: &str,
                               submissions: u32| Assignment {
            id,
            title: title.to_string(),
            description: description.to_string(),
            due_date: now + Duration::days(due_in_days),
            kind,
            points,
            difficulty,
            tags: tags.iter().cloned().collect::<Tags>(),
            professor: professor.to_string(),
            submissions,
            total_students: 45,
            status: AssignmentStatus::Active,
            instructions: String::new(),
            resources: vec![],
            allowed_file_types: vec![],
            max_file_size_mb: 0,
        };
        self.assignments = vec![
            seed_assignment(
                1,
                "React Component Development",
                "Build a responsive dashboard component using React and Tailwind CSS",
                7,
                AssignmentKind::Individual,
                100,
                Difficulty::Intermediate,
                &["react", "frontend", "ui/ux"],
                "Dr. Sarah Johnson",
                23,
            ),
            seed_assignment(
                2,
                "Database Design Project",
                "Design and implement a normalized database schema for an e-commerce platform",
                14,
                AssignmentKind::Group,
                150,
                Difficulty::Advanced,
                &["database", "sql", "backend"],
                "Prof. Michael Chen",
                8,
            ),
            seed_assignment(
                3,
                "Machine Learning Algorithm Implementation",
                "Implement and compare different classification algorithms on a real dataset",
                21,
                AssignmentKind::Individual,
                200,
                Difficulty::Expert,
                &["ml", "python", "data-science"],
                "Dr. Emily Rodriguez",
                12,
            ),
        ];

        let seed_notification = |id: RecordId,
                                 kind: NotificationKind,
                                 title: &str,
                                 message: &str,
                                 hours_ago: i64,
                                 read: bool| Notification {
            id,
            kind,
            title: title.to_string(),
            message: message.to_string(),
            timestamp: now - Duration::hours(hours_ago),
            read,
        };
        self.notifications = vec![
            seed_notification(
                1,
                NotificationKind::Assignment,
                "New Assignment Posted",
                "React Component Development assignment has been posted",
                2,
                false,
            ),
            seed_notification(
                2,
                NotificationKind::Grade,
                "Grade Available",
                "Your submission for Database Design has been graded",
                4,
                false,
            ),
            seed_notification(
                3,
                NotificationKind::Collaboration,
                "Team Message",
                "New message in Project Alpha collaboration room",
                6,
                true,
            ),
        ];
        self.ids.reserve(3);
        debug!(
            assignments = self.assignments.len(),
            notifications = self.notifications.len(),
            "seeded platform store"
        );
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn collaborations(&self) -> &[Collaboration] {
        &self.collaborations
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn find_assignment(&self, id: RecordId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id == id)
    }

    pub fn find_collaboration(&self, id: RecordId) -> Option<&Collaboration> {
        self.collaborations.iter().find(|c| c.id == id)
    }

    pub fn submissions_for(&self, assignment_id: RecordId) -> Vec<&Submission> {
        self.submissions
            .iter()
            .filter(|s| s.assignment_id == assignment_id)
            .collect()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn add_assignment(&mut self, draft: AssignmentDraft) -> Result<Assignment> {
        draft.validate()?;
        let id = self.ids.next(self.clock.now());
        let assignment = draft.into_assignment(id, self.default_total_students);
        info!(id, title = %assignment.title, "assignment added");
        self.assignments.insert(0, assignment.clone());
        Ok(assignment)
    }

    /// Merges `update` into the assignment with `id`, in place. Returns false
    /// and changes nothing when no such assignment exists.
    pub fn update_assignment(&mut self, id: RecordId, update: AssignmentUpdate) -> bool {
        match self.assignments.iter_mut().find(|a| a.id == id) {
            Some(assignment) => {
                update.apply_to(assignment);
                debug!(id, "assignment updated");
                true
            }
            None => {
                debug!(id, "update for unknown assignment ignored");
                false
            }
        }
    }

    pub fn add_submission(&mut self, draft: SubmissionDraft) -> Submission {
        let now = self.clock.now();
        let id = self.ids.next(now);
        let submission = draft.into_submission(id, now);
        info!(id, assignment = submission.assignment_id, "submission added");
        self.submissions.insert(0, submission.clone());
        submission
    }

    pub fn add_notification(&mut self, draft: NotificationDraft) -> Notification {
        let now = self.clock.now();
        let notification = Notification {
            id: self.ids.next(now),
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            timestamp: now,
            read: false,
        };
        debug!(id = notification.id, kind = %notification.kind, "notification added");
        self.notifications.insert(0, notification.clone());
        notification
    }

    /// Returns false when no notification has `id`.
    pub fn mark_notification_read(&mut self, id: RecordId) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub fn add_collaboration(&mut self, draft: CollaborationDraft) -> Collaboration {
        let now = self.clock.now();
        let id = self.ids.next(now);
        let collaboration = draft.into_collaboration(id, now);
        info!(id, name = %collaboration.name, "collaboration added");
        self.collaborations.insert(0, collaboration.clone());
        collaboration
    }
}
