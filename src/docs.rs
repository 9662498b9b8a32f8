// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::google_login,
        handlers::auth::google_callback,

        // --- Users ---
        handlers::auth::get_me,

        // --- Student ---
        handlers::student::file_complaint,
        handlers::student::list_my_complaints,

        // --- Mentor ---
        handlers::mentor::list_mentee_complaints,
        handlers::mentor::list_mentees,
        handlers::mentor::review_complaint,

        // --- Warden ---
        handlers::warden::get_board,
        handlers::warden::update_complaint,

        // --- Admin ---
        handlers::admin::list_hostels,
        handlers::admin::create_hostel,
        handlers::admin::get_hostel,
        handlers::admin::update_hostel,
        handlers::admin::delete_hostel,
        handlers::admin::list_rooms,
        handlers::admin::generate_rooms,
        handlers::admin::list_users,
        handlers::admin::create_user,
        handlers::admin::get_user,
        handlers::admin::update_user,
        handlers::admin::delete_user,
        handlers::admin::student_profile,
        handlers::admin::list_complaints,
        handlers::admin::complaint_summary,
        handlers::admin::create_complaint,
        handlers::admin::get_complaint,
        handlers::admin::update_complaint,
        handlers::admin::delete_complaint,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::SsoRedirect,

            // --- Users ---
            models::user::Role,
            models::user::User,
            models::user::CreateUserPayload,
            models::user::UpdateUserPayload,

            // --- Hostels ---
            models::hostel::HostelGender,
            models::hostel::Hostel,
            models::hostel::Room,
            models::hostel::HostelDetail,
            models::hostel::HostelPayload,

            // --- Complaints ---
            models::complaint::ComplaintStatus,
            models::complaint::Category,
            models::complaint::Complaint,
            models::complaint::FiledComplaint,
            models::complaint::CreateComplaintPayload,
            models::complaint::AdminComplaintPayload,
            models::complaint::MentorReviewPayload,
            models::complaint::WardenUpdatePayload,
            models::complaint::WardenBoard,
            models::complaint::StatusCount,
            models::complaint::StudentProfile,
        )
    ),
    tags(
        (name = "Auth", description = "Login local e Google"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Student", description = "Registro e acompanhamento de reclamações"),
        (name = "Mentor", description = "Revisão das reclamações dos mentorados"),
        (name = "Warden", description = "Painel do bloco e mudança de status"),
        (name = "Admin", description = "Blocos, usuários e reclamações")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
