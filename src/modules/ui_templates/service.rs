use std::collections::HashSet;

use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::ui_templates::model::{
    CreateUiComponentDto, CreateUiTemplateDto, DocumentUiComponent, DocumentUiTemplate,
    ReorderComponentsDto, UiTemplateWithComponents, UpdateUiTemplateDto, assemble_html,
};
use formation_core::AppError;

const UI_TEMPLATE_COLUMNS: &str = "id, name, description, document_type_id, created_at, updated_at";
const COMPONENT_COLUMNS: &str = "id, template_id, zone, html, css, sort_order, created_at, updated_at";

pub struct UiTemplateService;

impl UiTemplateService {
    #[instrument(skip(db, dto))]
    pub async fn create_template(
        db: &PgPool,
        dto: CreateUiTemplateDto,
    ) -> Result<DocumentUiTemplate, AppError> {
        sqlx::query_as::<_, DocumentUiTemplate>(&format!(
            "INSERT INTO document_ui_templates (name, description, document_type_id)
             VALUES ($1, $2, $3)
             RETURNING {UI_TEMPLATE_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.document_type_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!("Unknown document type"));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })
    }

    #[instrument(skip(db))]
    pub async fn get_templates(db: &PgPool) -> Result<Vec<DocumentUiTemplate>, AppError> {
        sqlx::query_as::<_, DocumentUiTemplate>(&format!(
            "SELECT {UI_TEMPLATE_COLUMNS} FROM document_ui_templates ORDER BY name"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch UI templates")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_template_by_id(
        db: &PgPool,
        id: Uuid,
    ) -> Result<DocumentUiTemplate, AppError> {
        sqlx::query_as::<_, DocumentUiTemplate>(&format!(
            "SELECT {UI_TEMPLATE_COLUMNS} FROM document_ui_templates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch UI template")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("UI template not found")))
    }

    /// Template with its components, zone-ordered.
    #[instrument(skip(db))]
    pub async fn get_template_with_components(
        db: &PgPool,
        id: Uuid,
    ) -> Result<UiTemplateWithComponents, AppError> {
        let template = Self::get_template_by_id(db, id).await?;
        let components = Self::get_components(db, id).await?;

        Ok(UiTemplateWithComponents {
            template,
            components,
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_template(
        db: &PgPool,
        id: Uuid,
        dto: UpdateUiTemplateDto,
    ) -> Result<DocumentUiTemplate, AppError> {
        let existing = Self::get_template_by_id(db, id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let description = dto.description.or(existing.description);

        sqlx::query_as::<_, DocumentUiTemplate>(&format!(
            "UPDATE document_ui_templates
             SET name = $1, description = $2, updated_at = NOW()
             WHERE id = $3
             RETURNING {UI_TEMPLATE_COLUMNS}"
        ))
        .bind(&name)
        .bind(&description)
        .bind(id)
        .fetch_one(db)
        .await
        .context("Failed to update UI template")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn delete_template(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM document_ui_templates WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete UI template")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "UI template not found"
            )));
        }

        Ok(())
    }

    /// Adds a component. Without an explicit `sort_order` it lands at the
    /// end of its zone.
    #[instrument(skip(db, dto))]
    pub async fn add_component(
        db: &PgPool,
        template_id: Uuid,
        dto: CreateUiComponentDto,
    ) -> Result<DocumentUiComponent, AppError> {
        Self::get_template_by_id(db, template_id).await?;

        sqlx::query_as::<_, DocumentUiComponent>(&format!(
            "INSERT INTO document_ui_components (template_id, zone, html, css, sort_order)
             VALUES ($1, $2, $3, $4,
                     COALESCE($5, (SELECT COALESCE(MAX(sort_order) + 1, 0)
                                   FROM document_ui_components
                                   WHERE template_id = $1 AND zone = $2)))
             RETURNING {COMPONENT_COLUMNS}"
        ))
        .bind(template_id)
        .bind(dto.zone)
        .bind(&dto.html)
        .bind(&dto.css)
        .bind(dto.sort_order)
        .fetch_one(db)
        .await
        .context("Failed to add UI component")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn delete_component(
        db: &PgPool,
        template_id: Uuid,
        component_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM document_ui_components WHERE id = $1 AND template_id = $2",
        )
        .bind(component_id)
        .bind(template_id)
        .execute(db)
        .await
        .context("Failed to delete UI component")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "UI component not found"
            )));
        }

        Ok(())
    }

    /// Rewrites `sort_order` from the given id order. The id list must be a
    /// permutation of the template's components.
    #[instrument(skip(db, dto))]
    pub async fn reorder_components(
        db: &PgPool,
        template_id: Uuid,
        dto: ReorderComponentsDto,
    ) -> Result<Vec<DocumentUiComponent>, AppError> {
        let components = Self::get_components(db, template_id).await?;

        let existing: HashSet<Uuid> = components.iter().map(|c| c.id).collect();
        let provided: HashSet<Uuid> = dto.ordered_ids.iter().copied().collect();

        if existing != provided || dto.ordered_ids.len() != components.len() {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Ordered ids must be a permutation of the template's components"
            )));
        }

        let mut tx = db.begin().await.context("Failed to open transaction")?;

        for (position, component_id) in dto.ordered_ids.iter().enumerate() {
            sqlx::query(
                "UPDATE document_ui_components
                 SET sort_order = $1, updated_at = NOW()
                 WHERE id = $2",
            )
            .bind(position as i32)
            .bind(component_id)
            .execute(&mut *tx)
            .await
            .context("Failed to reorder UI component")
            .map_err(AppError::database)?;
        }

        tx.commit().await.context("Failed to commit reorder")?;

        Self::get_components(db, template_id).await
    }

    /// Assembles the template into a single HTML fragment.
    #[instrument(skip(db))]
    pub async fn render_template(db: &PgPool, template_id: Uuid) -> Result<String, AppError> {
        Self::get_template_by_id(db, template_id).await?;
        let components = Self::get_components(db, template_id).await?;
        Ok(assemble_html(&components))
    }

    async fn get_components(
        db: &PgPool,
        template_id: Uuid,
    ) -> Result<Vec<DocumentUiComponent>, AppError> {
        sqlx::query_as::<_, DocumentUiComponent>(&format!(
            "SELECT {COMPONENT_COLUMNS}
             FROM document_ui_components
             WHERE template_id = $1
             ORDER BY zone, sort_order"
        ))
        .bind(template_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch UI components")
        .map_err(AppError::database)
    }
}
