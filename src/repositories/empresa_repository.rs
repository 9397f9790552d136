use crate::database::{DatabaseConnection, SqlValue, WhereClause};
use crate::dto::api_response::Paginacion;
use crate::dto::empresa_dto::{ActualizarEmpresaRequest, CrearEmpresaRequest, EmpresaFiltros};
use crate::models::empresa::EmpresaConvenio;
use crate::utils::errors::AppResult;

const COLUMNAS: &str = "id, nombre_empresa, descripcion, categoria, contacto_nombre, \
     email_contacto, telefono, sitio_web, direccion, logo_url, descuento_porcentaje, activo, \
     created_at, updated_at";

pub struct EmpresaRepository {
    db: DatabaseConnection,
}

impl EmpresaRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Listado ordenado por nombre. `solo_activas` ignora el filtro `activo`.
    pub async fn list(
        &self,
        filtros: &EmpresaFiltros,
        solo_activas: bool,
        paginacion: Paginacion,
    ) -> AppResult<(Vec<EmpresaConvenio>, i64)> {
        let mut clause = WhereClause::new();
        if solo_activas {
            clause.push_raw("activo = 1");
        } else if let Some(activo) = filtros.activo {
            clause.push("activo = ?", activo);
        }
        if let Some(categoria) = filtros.categoria.as_deref().filter(|c| !c.trim().is_empty()) {
            clause.push("categoria = ?", categoria.trim());
        }
        if let Some(buscar) = filtros.buscar.as_deref().filter(|b| !b.trim().is_empty()) {
            clause.push_search(
                "(nombre_empresa LIKE ? OR descripcion LIKE ? OR categoria LIKE ?)",
                buscar,
            );
        }

        let total = self
            .db
            .count(
                &format!("SELECT COUNT(*) FROM empresas_convenio{}", clause.sql()),
                clause.params(),
            )
            .await?;

        let sql = format!(
            "SELECT {} FROM empresas_convenio{} ORDER BY nombre_empresa, id LIMIT ? OFFSET ?",
            COLUMNAS,
            clause.sql()
        );
        let empresas = self
            .db
            .select(&sql, &clause.params_with_page(paginacion.limit(), paginacion.offset()))
            .await?;

        Ok((empresas, total))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<EmpresaConvenio>> {
        let sql = format!("SELECT {} FROM empresas_convenio WHERE id = ?", COLUMNAS);
        Ok(self.db.select_one(&sql, &[id.into()]).await?)
    }

    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        let total = self
            .db
            .count("SELECT COUNT(*) FROM empresas_convenio WHERE id = ?", &[id.into()])
            .await?;
        Ok(total > 0)
    }

    pub async fn create(&self, request: &CrearEmpresaRequest) -> AppResult<i64> {
        let params: Vec<SqlValue> = vec![
            request.nombre_empresa.trim().into(),
            request.descripcion.clone().into(),
            request.categoria.clone().into(),
            request.contacto_nombre.clone().into(),
            request.email_contacto.clone().into(),
            request.telefono.clone().into(),
            request.sitio_web.clone().into(),
            request.direccion.clone().into(),
            request.logo_url.clone().into(),
            request.descuento_porcentaje.into(),
            request.activo.unwrap_or(true).into(),
        ];

        Ok(self
            .db
            .insert(
                "INSERT INTO empresas_convenio (nombre_empresa, descripcion, categoria, \
                 contacto_nombre, email_contacto, telefono, sitio_web, direccion, logo_url, \
                 descuento_porcentaje, activo, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, UTC_TIMESTAMP(), UTC_TIMESTAMP())",
                &params,
            )
            .await?)
    }

    pub async fn update(&self, id: i64, cambios: &ActualizarEmpresaRequest) -> AppResult<()> {
        let params: Vec<SqlValue> = vec![
            cambios.nombre_empresa.as_deref().map(str::trim).into(),
            cambios.descripcion.clone().into(),
            cambios.categoria.clone().into(),
            cambios.contacto_nombre.clone().into(),
            cambios.email_contacto.clone().into(),
            cambios.telefono.clone().into(),
            cambios.sitio_web.clone().into(),
            cambios.direccion.clone().into(),
            cambios.logo_url.clone().into(),
            cambios.descuento_porcentaje.into(),
            cambios.activo.into(),
            id.into(),
        ];

        self.db
            .update(
                "UPDATE empresas_convenio SET nombre_empresa = COALESCE(?, nombre_empresa), \
                 descripcion = COALESCE(?, descripcion), categoria = COALESCE(?, categoria), \
                 contacto_nombre = COALESCE(?, contacto_nombre), \
                 email_contacto = COALESCE(?, email_contacto), telefono = COALESCE(?, telefono), \
                 sitio_web = COALESCE(?, sitio_web), direccion = COALESCE(?, direccion), \
                 logo_url = COALESCE(?, logo_url), \
                 descuento_porcentaje = COALESCE(?, descuento_porcentaje), \
                 activo = COALESCE(?, activo), updated_at = UTC_TIMESTAMP() WHERE id = ?",
                &params,
            )
            .await?;
        Ok(())
    }

    /// Baja lógica
    pub async fn desactivar(&self, id: i64) -> AppResult<()> {
        self.db
            .update(
                "UPDATE empresas_convenio SET activo = 0, updated_at = UTC_TIMESTAMP() WHERE id = ?",
                &[id.into()],
            )
            .await?;
        Ok(())
    }

    pub async fn set_logo(&self, id: i64, logo_url: &str) -> AppResult<()> {
        self.db
            .update(
                "UPDATE empresas_convenio SET logo_url = ?, updated_at = UTC_TIMESTAMP() WHERE id = ?",
                &[logo_url.into(), id.into()],
            )
            .await?;
        Ok(())
    }
}
