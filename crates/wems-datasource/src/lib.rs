// wems-datasource: Dashboard datasource adapter for the WAGO WEMS API
//
// Bridges a dashboarding host and the WEMS cloud: settings loading from
// the host's config blob, the query descriptor model, columnar frame
// shaping, and the three inbound operations (run queries, list
// resources, check health). All network mechanics live in `wems-api`.

pub mod datasource;
pub mod frame;
pub mod query;
pub mod settings;

pub use datasource::{Datasource, HealthResult, HealthStatus, ResourceResponse};
pub use frame::{Field, FieldValues, Frame};
pub use query::{
    DataQuery, DataResponse, QueryDataResponse, QueryRequest, ResponseError, ResponseStatus,
    TimeRange,
};
pub use settings::{DEFAULT_BASE_URL, DatasourceSettings, SettingsError};
