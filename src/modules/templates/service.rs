use std::collections::HashMap;

use anyhow::Context;
use serde_json::Value;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::templates::model::{
    CreateTemplateDto, DocumentTemplate, RenderTemplateDto, RenderedTemplate, UpdateTemplateDto,
    render_placeholders,
};
use formation_core::AppError;

const TEMPLATE_COLUMNS: &str = "id, name, document_type_id, content, default_metadata, \
     is_default, is_global, created_at, updated_at";

pub struct TemplateService;

impl TemplateService {
    /// Creates a template. New templates are never the default; promotion
    /// goes through [`Self::set_default`].
    #[instrument(skip(db, dto))]
    pub async fn create_template(
        db: &PgPool,
        dto: CreateTemplateDto,
    ) -> Result<DocumentTemplate, AppError> {
        sqlx::query_as::<_, DocumentTemplate>(&format!(
            "INSERT INTO document_templates
                 (name, document_type_id, content, default_metadata, is_global)
             VALUES ($1, $2, $3, COALESCE($4, '{{}}'::jsonb), $5)
             RETURNING {TEMPLATE_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(dto.document_type_id)
        .bind(&dto.content)
        .bind(&dto.default_metadata)
        .bind(dto.is_global)
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

    /// Lists templates, optionally restricted to one document type.
    #[instrument(skip(db))]
    pub async fn get_templates(
        db: &PgPool,
        document_type_id: Option<Uuid>,
    ) -> Result<Vec<DocumentTemplate>, AppError> {
        sqlx::query_as::<_, DocumentTemplate>(&format!(
            "SELECT {TEMPLATE_COLUMNS}
             FROM document_templates
             WHERE ($1::uuid IS NULL OR document_type_id = $1)
             ORDER BY name"
        ))
        .bind(document_type_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch templates")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_template_by_id(db: &PgPool, id: Uuid) -> Result<DocumentTemplate, AppError> {
        sqlx::query_as::<_, DocumentTemplate>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM document_templates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch template")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Template not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_template(
        db: &PgPool,
        id: Uuid,
        dto: UpdateTemplateDto,
    ) -> Result<DocumentTemplate, AppError> {
        let existing = Self::get_template_by_id(db, id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let content = dto.content.unwrap_or(existing.content);
        let default_metadata = dto.default_metadata.unwrap_or(existing.default_metadata);

        sqlx::query_as::<_, DocumentTemplate>(&format!(
            "UPDATE document_templates
             SET name = $1, content = $2, default_metadata = $3, updated_at = NOW()
             WHERE id = $4
             RETURNING {TEMPLATE_COLUMNS}"
        ))
        .bind(&name)
        .bind(&content)
        .bind(&default_metadata)
        .bind(id)
        .fetch_one(db)
        .await
        .context("Failed to update template")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn delete_template(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM document_templates WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete template")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Template not found")));
        }

        Ok(())
    }

    /// Promotes a template to default within its (document type, global)
    /// group, demoting the previous default in the same transaction.
    #[instrument(skip(db))]
    pub async fn set_default(db: &PgPool, id: Uuid) -> Result<DocumentTemplate, AppError> {
        let template = Self::get_template_by_id(db, id).await?;

        let mut tx = db.begin().await.context("Failed to open transaction")?;

        sqlx::query(
            "UPDATE document_templates
             SET is_default = FALSE, updated_at = NOW()
             WHERE is_default
               AND is_global = $1
               AND document_type_id IS NOT DISTINCT FROM $2",
        )
        .bind(template.is_global)
        .bind(template.document_type_id)
        .execute(&mut *tx)
        .await
        .context("Failed to demote previous default template")
        .map_err(AppError::database)?;

        let promoted = sqlx::query_as::<_, DocumentTemplate>(&format!(
            "UPDATE document_templates
             SET is_default = TRUE, updated_at = NOW()
             WHERE id = $1
             RETURNING {TEMPLATE_COLUMNS}"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to promote template")
        .map_err(AppError::database)?;

        tx.commit().await.context("Failed to commit promotion")?;

        Ok(promoted)
    }

    /// Copies a template under a new name. The copy is never the default.
    #[instrument(skip(db))]
    pub async fn duplicate_template(db: &PgPool, id: Uuid) -> Result<DocumentTemplate, AppError> {
        let source = Self::get_template_by_id(db, id).await?;
        let copy = source.copy_fields();

        sqlx::query_as::<_, DocumentTemplate>(&format!(
            "INSERT INTO document_templates
                 (name, document_type_id, content, default_metadata, is_global, is_default)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {TEMPLATE_COLUMNS}"
        ))
        .bind(&copy.name)
        .bind(copy.document_type_id)
        .bind(&copy.content)
        .bind(&copy.default_metadata)
        .bind(copy.is_global)
        .bind(copy.is_default)
        .fetch_one(db)
        .await
        .context("Failed to duplicate template")
        .map_err(AppError::database)
    }

    /// Renders a template. `default_metadata` seeds the placeholder values;
    /// the caller's values win on conflict.
    #[instrument(skip(db, dto))]
    pub async fn render_template(
        db: &PgPool,
        id: Uuid,
        dto: RenderTemplateDto,
    ) -> Result<RenderedTemplate, AppError> {
        let template = Self::get_template_by_id(db, id).await?;

        let mut values = Self::metadata_defaults(&template.default_metadata);
        values.extend(dto.values);

        Ok(render_placeholders(&template.content, &values))
    }

    fn metadata_defaults(metadata: &Value) -> HashMap<String, String> {
        let Some(map) = metadata.as_object() else {
            return HashMap::new();
        };

        map.iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect()
    }
}
