use utoipa::OpenApi;

use crate::modules::audit::model::{AuditAction, AuditLog, FormattedAuditLog, PaginatedAuditLogsResponse};
use crate::modules::documents::controller::PaginatedDocumentsResponse;
use crate::modules::documents::model::{
    CreateDocumentDto, Document, DocumentVersion, UpdateDocumentDto,
};
use crate::modules::document_types::model::{
    CreateDocumentTypeDto, DocumentType, UpdateDocumentTypeDto,
};
use crate::modules::enrollments::model::{
    CreateEnrollmentDto, EnrollmentStatus, PaginatedEnrollmentsResponse, StudentEnrollment,
    UpdateEnrollmentStatusDto,
};
use crate::modules::metadata::model::{
    DocumentMetadata, MetadataValueType, SetMetadataDto, TypedMetadata, UpdateMetadataDto,
};
use crate::modules::progress::controller::AssessmentResponse;
use crate::modules::sessions::model::{CreateSessionDto, TrainingSession};
use crate::modules::progress::model::{
    AtRiskStudent, RiskFactor, RiskSweepSummary, StudentProgress, UpsertProgressDto,
};
use crate::modules::students::controller::{ErrorResponse, ForgotPasswordDto};
use crate::modules::students::model::{
    CreateStudentDto, DashboardStats, PaginatedStudentsResponse, ResetPasswordDto, Student,
    UpdateStudentDto, VerifyEmailDto,
};
use crate::modules::templates::model::{
    CreateTemplateDto, DocumentTemplate, RenderTemplateDto, RenderedTemplate, UpdateTemplateDto,
};
use crate::modules::tokens::controller::PaginatedTokensResponse;
use crate::modules::tokens::model::{
    AccessToken, BulkIssueTokensDto, IssueTokenDto, TokenPurpose, TokenStatus, TokenWithStatus,
};
use crate::modules::ui_templates::model::{
    CreateUiComponentDto, CreateUiTemplateDto, DocumentUiComponent, DocumentUiTemplate,
    ReorderComponentsDto, UiTemplateWithComponents, UiZone, UpdateUiTemplateDto,
};
use formation_core::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::export_students,
        crate::modules::students::controller::get_dashboard_stats,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::students::controller::send_welcome_email,
        crate::modules::students::controller::request_email_verification,
        crate::modules::students::controller::forgot_password,
        crate::modules::students::controller::reset_password,
        crate::modules::students::controller::verify_email,
        crate::modules::sessions::controller::create_session,
        crate::modules::sessions::controller::get_sessions,
        crate::modules::sessions::controller::get_session,
        crate::modules::enrollments::controller::create_enrollment,
        crate::modules::enrollments::controller::get_enrollments,
        crate::modules::enrollments::controller::get_enrollment,
        crate::modules::enrollments::controller::get_student_enrollments,
        crate::modules::enrollments::controller::update_enrollment_status,
        crate::modules::progress::controller::upsert_progress,
        crate::modules::progress::controller::get_progress,
        crate::modules::progress::controller::assess_enrollment,
        crate::modules::progress::controller::assess_all,
        crate::modules::progress::controller::get_at_risk_students,
        crate::modules::tokens::controller::issue_token,
        crate::modules::tokens::controller::bulk_issue_tokens,
        crate::modules::tokens::controller::get_tokens,
        crate::modules::tokens::controller::get_token,
        crate::modules::tokens::controller::delete_token,
        crate::modules::audit::controller::get_audit_logs,
        crate::modules::audit::controller::get_entity_history,
        crate::modules::documents::controller::create_document,
        crate::modules::documents::controller::get_documents,
        crate::modules::documents::controller::get_document,
        crate::modules::documents::controller::update_document,
        crate::modules::documents::controller::delete_document,
        crate::modules::documents::controller::get_document_versions,
        crate::modules::documents::controller::restore_document_version,
        crate::modules::document_types::controller::create_document_type,
        crate::modules::document_types::controller::get_document_types,
        crate::modules::document_types::controller::get_document_type,
        crate::modules::document_types::controller::update_document_type,
        crate::modules::document_types::controller::delete_document_type,
        crate::modules::metadata::controller::set_metadata,
        crate::modules::metadata::controller::get_metadata,
        crate::modules::metadata::controller::get_typed_metadata,
        crate::modules::metadata::controller::update_metadata,
        crate::modules::metadata::controller::delete_metadata,
        crate::modules::templates::controller::create_template,
        crate::modules::templates::controller::get_templates,
        crate::modules::templates::controller::get_template,
        crate::modules::templates::controller::update_template,
        crate::modules::templates::controller::delete_template,
        crate::modules::templates::controller::set_default_template,
        crate::modules::templates::controller::duplicate_template,
        crate::modules::templates::controller::render_template,
        crate::modules::ui_templates::controller::create_ui_template,
        crate::modules::ui_templates::controller::get_ui_templates,
        crate::modules::ui_templates::controller::get_ui_template,
        crate::modules::ui_templates::controller::update_ui_template,
        crate::modules::ui_templates::controller::delete_ui_template,
        crate::modules::ui_templates::controller::add_ui_component,
        crate::modules::ui_templates::controller::delete_ui_component,
        crate::modules::ui_templates::controller::reorder_ui_components,
        crate::modules::ui_templates::controller::render_ui_template,
    ),
    components(
        schemas(
            ErrorResponse,
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            ForgotPasswordDto,
            ResetPasswordDto,
            VerifyEmailDto,
            DashboardStats,
            PaginatedStudentsResponse,
            TrainingSession,
            CreateSessionDto,
            StudentEnrollment,
            EnrollmentStatus,
            CreateEnrollmentDto,
            UpdateEnrollmentStatusDto,
            PaginatedEnrollmentsResponse,
            StudentProgress,
            UpsertProgressDto,
            RiskFactor,
            AssessmentResponse,
            RiskSweepSummary,
            AtRiskStudent,
            AccessToken,
            TokenPurpose,
            TokenStatus,
            TokenWithStatus,
            IssueTokenDto,
            BulkIssueTokensDto,
            PaginatedTokensResponse,
            AuditAction,
            AuditLog,
            FormattedAuditLog,
            PaginatedAuditLogsResponse,
            Document,
            DocumentVersion,
            CreateDocumentDto,
            UpdateDocumentDto,
            PaginatedDocumentsResponse,
            DocumentType,
            CreateDocumentTypeDto,
            UpdateDocumentTypeDto,
            DocumentMetadata,
            MetadataValueType,
            TypedMetadata,
            SetMetadataDto,
            UpdateMetadataDto,
            DocumentTemplate,
            CreateTemplateDto,
            UpdateTemplateDto,
            RenderTemplateDto,
            RenderedTemplate,
            DocumentUiTemplate,
            DocumentUiComponent,
            UiZone,
            CreateUiTemplateDto,
            UpdateUiTemplateDto,
            CreateUiComponentDto,
            ReorderComponentsDto,
            UiTemplateWithComponents,
            PaginationMeta,
            PaginationParams,
        )
    ),
    tags(
        (name = "Students", description = "Student management and credentials"),
        (name = "Sessions", description = "Training session reference data"),
        (name = "Enrollments", description = "Session enrollments and status transitions"),
        (name = "Progress", description = "Progress tracking and dropout risk scoring"),
        (name = "Tokens", description = "Access token generation and expiration tracking"),
        (name = "Audit", description = "Change history"),
        (name = "Documents", description = "Documents and version history"),
        (name = "Document types", description = "Document type reference data"),
        (name = "Metadata", description = "Typed document metadata"),
        (name = "Templates", description = "Document templates and rendering"),
        (name = "UI templates", description = "Zoned UI templates and components")
    ),
    info(
        title = "Formation API",
        version = "0.1.0",
        description = "Training organization management API",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;
