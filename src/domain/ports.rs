use crate::domain::model::{
    CatalogueQuery, CatalogueTable, JsonStyle, OutputTarget, SelectionPolicy, TransformResult,
};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CatalogueSource: Send + Sync {
    async fn query(&self, query: &CatalogueQuery) -> Result<CatalogueTable>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn policy(&self) -> SelectionPolicy;
    fn fields(&self) -> Vec<String>;
    fn condition(&self) -> Option<String>;
    fn limit(&self) -> usize;
    fn output(&self) -> OutputTarget;
    fn json_style(&self) -> JsonStyle;

    fn catalogue_query(&self) -> CatalogueQuery {
        let fields = self.fields();
        CatalogueQuery {
            fields: if fields.is_empty() { None } else { Some(fields) },
            condition: self.condition(),
        }
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<CatalogueTable>;
    async fn transform(&self, table: CatalogueTable) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
