// src/services/lifecycle.rs
//
// Máquina de estados da reclamação. Funções puras: quem chama já abriu a
// transação, já checou papel e posse, e grava o resultado.

use chrono::{DateTime, Utc};

use crate::{
    common::error::AppError,
    models::complaint::{Complaint, ComplaintStatus, WardenBoard, WardenBucket},
};

/// Estado inicial conforme o filtro de conteúdo: (status, is_abusive).
pub fn initial_state(flagged: bool) -> (ComplaintStatus, bool) {
    if flagged {
        (ComplaintStatus::Flagged, true)
    } else {
        (ComplaintStatus::Pending, false)
    }
}

impl ComplaintStatus {
    /// Estados a partir dos quais o Warden pode mover a reclamação.
    /// Flagged, Resolved e Rejected não têm saída.
    pub fn accepts_warden_update(self) -> bool {
        match self {
            ComplaintStatus::Pending | ComplaintStatus::InProgress => true,
            ComplaintStatus::Resolved | ComplaintStatus::Flagged | ComplaintStatus::Rejected => false,
        }
    }

    /// Destinos que o Warden pode escolher.
    pub fn is_warden_target(self) -> bool {
        match self {
            ComplaintStatus::InProgress
            | ComplaintStatus::Resolved
            | ComplaintStatus::Rejected
            | ComplaintStatus::Flagged => true,
            ComplaintStatus::Pending => false,
        }
    }
}

/// Aplica a decisão do Warden. Em caso de erro a reclamação não é tocada.
pub fn warden_transition(
    complaint: &mut Complaint,
    to: ComplaintStatus,
    comment: Option<String>,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let from = complaint.status;
    if !from.accepts_warden_update() || !to.is_warden_target() {
        return Err(AppError::InvalidTransition { from, to });
    }

    complaint.status = to;
    complaint.warden_comment = comment;
    if to == ComplaintStatus::Resolved {
        complaint.resolved_at = Some(now);
    }
    Ok(())
}

// O mentor só comenta e marca urgência; o status fica com o Warden
pub fn mentor_review(complaint: &mut Complaint, comment: Option<String>, is_urgent: bool) {
    complaint.mentor_comment = comment;
    complaint.is_urgent = is_urgent;
}

/// Coluna do painel do Warden. Ordem de prioridade:
/// Flagged > Resolved/Rejected > urgente > InProgress > Pending.
pub fn classify(complaint: &Complaint) -> WardenBucket {
    match complaint.status {
        ComplaintStatus::Flagged => WardenBucket::Archived,
        ComplaintStatus::Resolved | ComplaintStatus::Rejected => WardenBucket::Completed,
        _ if complaint.is_urgent => WardenBucket::Escalated,
        ComplaintStatus::InProgress => WardenBucket::InProgress,
        ComplaintStatus::Pending => WardenBucket::Pending,
    }
}

/// Distribui as reclamações nas colunas, preservando a ordem de entrada.
pub fn build_board(complaints: Vec<Complaint>) -> WardenBoard {
    let mut board = WardenBoard::default();
    for complaint in complaints {
        let column = match classify(&complaint) {
            WardenBucket::Archived => &mut board.archived,
            WardenBucket::Completed => &mut board.completed,
            WardenBucket::Escalated => &mut board.escalated,
            WardenBucket::InProgress => &mut board.in_progress,
            WardenBucket::Pending => &mut board.pending,
        };
        column.push(complaint);
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    use crate::models::complaint::Category;

    fn complaint(status: ComplaintStatus, is_urgent: bool) -> Complaint {
        Complaint {
            id: Uuid::new_v4(),
            heading: "wifi down".into(),
            description: "no signal".into(),
            category: Category::Wifi,
            status,
            is_urgent,
            is_abusive: false,
            mentor_comment: None,
            warden_comment: None,
            user_id: Uuid::new_v4(),
            hostel_id: Uuid::new_v4(),
            created_at: Utc::now(),
            resolved_at: None,
        }
    }

    #[test]
    fn flagged_content_starts_flagged_and_abusive() {
        assert_eq!(initial_state(true), (ComplaintStatus::Flagged, true));
        assert_eq!(initial_state(false), (ComplaintStatus::Pending, false));
    }

    #[rstest]
    #[case(ComplaintStatus::Pending, ComplaintStatus::InProgress)]
    #[case(ComplaintStatus::Pending, ComplaintStatus::Resolved)]
    #[case(ComplaintStatus::Pending, ComplaintStatus::Rejected)]
    #[case(ComplaintStatus::Pending, ComplaintStatus::Flagged)]
    #[case(ComplaintStatus::InProgress, ComplaintStatus::InProgress)]
    #[case(ComplaintStatus::InProgress, ComplaintStatus::Resolved)]
    #[case(ComplaintStatus::InProgress, ComplaintStatus::Rejected)]
    fn warden_moves_open_complaints(#[case] from: ComplaintStatus, #[case] to: ComplaintStatus) {
        let mut c = complaint(from, false);
        warden_transition(&mut c, to, Some("on it".into()), Utc::now()).expect("allowed");
        assert_eq!(c.status, to);
        assert_eq!(c.warden_comment.as_deref(), Some("on it"));
    }

    #[rstest]
    #[case(ComplaintStatus::Flagged, ComplaintStatus::Pending)]
    #[case(ComplaintStatus::Flagged, ComplaintStatus::InProgress)]
    #[case(ComplaintStatus::Rejected, ComplaintStatus::InProgress)]
    #[case(ComplaintStatus::Resolved, ComplaintStatus::Rejected)]
    #[case(ComplaintStatus::InProgress, ComplaintStatus::Pending)]
    fn closed_or_backward_moves_are_refused(#[case] from: ComplaintStatus, #[case] to: ComplaintStatus) {
        let mut c = complaint(from, false);
        let before = c.clone();

        let err = warden_transition(&mut c, to, Some("x".into()), Utc::now()).expect_err("refused");

        assert!(matches!(err, AppError::InvalidTransition { .. }));
        assert_eq!(c.status, before.status);
        assert_eq!(c.warden_comment, before.warden_comment);
        assert_eq!(c.resolved_at, None);
    }

    #[test]
    fn only_resolved_stamps_resolved_at() {
        let now = Utc::now();

        let mut c = complaint(ComplaintStatus::Pending, false);
        warden_transition(&mut c, ComplaintStatus::InProgress, None, now).expect("in progress");
        assert_eq!(c.resolved_at, None);

        warden_transition(&mut c, ComplaintStatus::Resolved, None, now).expect("resolved");
        assert_eq!(c.resolved_at, Some(now));

        let mut rejected = complaint(ComplaintStatus::Pending, false);
        warden_transition(&mut rejected, ComplaintStatus::Rejected, None, now).expect("rejected");
        assert_eq!(rejected.resolved_at, None);
    }

    #[test]
    fn mentor_review_touches_only_comment_and_urgency() {
        let mut c = complaint(ComplaintStatus::Pending, false);
        mentor_review(&mut c, Some("please prioritise".into()), true);

        assert!(c.is_urgent);
        assert_eq!(c.mentor_comment.as_deref(), Some("please prioritise"));
        assert_eq!(c.status, ComplaintStatus::Pending);
    }

    #[rstest]
    #[case(ComplaintStatus::Flagged, true, WardenBucket::Archived)]
    #[case(ComplaintStatus::Flagged, false, WardenBucket::Archived)]
    #[case(ComplaintStatus::Resolved, true, WardenBucket::Completed)]
    #[case(ComplaintStatus::Rejected, false, WardenBucket::Completed)]
    #[case(ComplaintStatus::Pending, true, WardenBucket::Escalated)]
    #[case(ComplaintStatus::InProgress, true, WardenBucket::Escalated)]
    #[case(ComplaintStatus::InProgress, false, WardenBucket::InProgress)]
    #[case(ComplaintStatus::Pending, false, WardenBucket::Pending)]
    fn classification_follows_priority(
        #[case] status: ComplaintStatus,
        #[case] is_urgent: bool,
        #[case] expected: WardenBucket,
    ) {
        assert_eq!(classify(&complaint(status, is_urgent)), expected);
    }

    #[test]
    fn board_places_every_complaint_exactly_once() {
        let mut complaints = Vec::new();
        for status in ComplaintStatus::ALL {
            complaints.push(complaint(status, false));
            complaints.push(complaint(status, true));
        }
        let total = complaints.len();

        let board = build_board(complaints);

        assert_eq!(
            board.pending.len()
                + board.escalated.len()
                + board.in_progress.len()
                + board.archived.len()
                + board.completed.len(),
            total
        );
        assert_eq!(board.archived.len(), 2);
        assert_eq!(board.completed.len(), 4);
        assert_eq!(board.escalated.len(), 2);
        assert_eq!(board.in_progress.len(), 1);
        assert_eq!(board.pending.len(), 1);
    }
}
