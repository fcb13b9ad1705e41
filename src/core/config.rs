use chrono::NaiveDate;
use std::collections::HashMap;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub zendesk: ZendeskConfig,
    pub case_job: JobConfig,
    pub order_job: JobConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// Connection settings for the two databases the jobs touch: the CRM
/// database that pending records are fetched from, and the BR database
/// that ticket references and processing statuses are written back to.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub crm_url: String,
    pub br_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Zendesk API connection, endpoint paths, and the ticket-field ids that
/// are deployment-specific (custom field ids, brand/group/form ids).
#[derive(Debug, Clone)]
pub struct ZendeskConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub create_ticket_path: String,
    pub update_ticket_path: String,
    pub assignee_email: String,
    pub brand_id: String,
    pub group_id: String,
    pub ticket_form_id: String,
    pub member_id_field: String,
    pub member_name_field: String,
    pub carrier_name_field: String,
    pub plan_name_field: String,
    pub requestor_type_field: String,
    pub status_tags: HashMap<String, String>,
    pub carrier_tags: HashMap<String, String>,
    pub requestor_tags: HashMap<i32, String>,
}

/// Per-job polling window and cadence. Two instances exist: one for the
/// case-ticket job and one for the order-change job.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub enabled: bool,
    pub from_date: NaiveDate,
    pub batch_size: i64,
    pub interval_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            zendesk: ZendeskConfig::from_env()?,
            case_job: JobConfig::from_env("CASE_JOB")?,
            order_job: JobConfig::from_env("ORDER_JOB")?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Conservative pool defaults; the workers hold connections only briefly
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let crm_url =
            env::var("CRM_DATABASE_URL").map_err(|_| "CRM_DATABASE_URL must be set".to_string())?;

        // Write-backs go to the same database when a separate BR connection
        // is not configured.
        let br_url = env::var("BR_DATABASE_URL").unwrap_or_else(|_| crm_url.clone());

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            crm_url,
            br_url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl ZendeskConfig {
    const DEFAULT_CREATE_TICKET_PATH: &'static str = "/api/v2/tickets.json";
    const DEFAULT_UPDATE_TICKET_PATH: &'static str = "/api/v2/tickets/";

    /// Custom-status tag ids keyed by the human status names used on the
    /// source records. Deployments override via ZENDESK_STATUS_TAGS.
    const DEFAULT_STATUS_TAGS: &'static str = "New:18278079240595,\
Reviewed:18278090188563,\
Closed Partially:18278079252371,\
In Review:18278108787731,\
Pending Processing:18278090200083,\
Pending:18278079266451,\
Closed:18278108800147,\
Solved:18278090214035,\
Failed:18278079278227,\
Closed Approved:18278108812691,\
Closed Declined:18278090226067";

    const DEFAULT_REQUESTOR_TAGS: &'static str =
        "1:requestor_member,2:requestor_caregiver,3:requestor_health_plan";

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("ZENDESK_BASE_URL")
            .map_err(|_| "ZENDESK_BASE_URL environment variable is required".to_string())?;
        let username = env::var("ZENDESK_USERNAME")
            .map_err(|_| "ZENDESK_USERNAME environment variable is required".to_string())?;
        let password = env::var("ZENDESK_PASSWORD")
            .map_err(|_| "ZENDESK_PASSWORD environment variable is required".to_string())?;

        let create_ticket_path = env::var("ZENDESK_CREATE_TICKET_PATH")
            .unwrap_or_else(|_| Self::DEFAULT_CREATE_TICKET_PATH.to_string());
        let update_ticket_path = env::var("ZENDESK_UPDATE_TICKET_PATH")
            .unwrap_or_else(|_| Self::DEFAULT_UPDATE_TICKET_PATH.to_string());

        let assignee_email = env::var("ZENDESK_ASSIGNEE_EMAIL")
            .map_err(|_| "ZENDESK_ASSIGNEE_EMAIL environment variable is required".to_string())?;
        let brand_id = env::var("ZENDESK_BRAND_ID").unwrap_or_default();
        let group_id = env::var("ZENDESK_GROUP_ID").unwrap_or_default();
        let ticket_form_id = env::var("ZENDESK_TICKET_FORM_ID").unwrap_or_default();

        let member_id_field = env::var("ZENDESK_FIELD_MEMBER_ID").unwrap_or_default();
        let member_name_field = env::var("ZENDESK_FIELD_MEMBER_NAME").unwrap_or_default();
        let carrier_name_field = env::var("ZENDESK_FIELD_CARRIER_NAME").unwrap_or_default();
        let plan_name_field = env::var("ZENDESK_FIELD_PLAN_NAME").unwrap_or_default();
        let requestor_type_field = env::var("ZENDESK_FIELD_REQUESTOR_TYPE").unwrap_or_default();

        let status_tags = parse_tag_list(
            &env::var("ZENDESK_STATUS_TAGS")
                .unwrap_or_else(|_| Self::DEFAULT_STATUS_TAGS.to_string()),
        );

        // Carrier tags are entirely deployment-specific; no defaults
        let carrier_tags = parse_tag_list(&env::var("ZENDESK_CARRIER_TAGS").unwrap_or_default());

        let requestor_tags = parse_tag_list(
            &env::var("ZENDESK_REQUESTOR_TAGS")
                .unwrap_or_else(|_| Self::DEFAULT_REQUESTOR_TAGS.to_string()),
        )
        .into_iter()
        .filter_map(|(k, v)| k.parse::<i32>().ok().map(|code| (code, v)))
        .collect();

        Ok(Self {
            base_url,
            username,
            password,
            create_ticket_path,
            update_ticket_path,
            assignee_email,
            brand_id,
            group_id,
            ticket_form_id,
            member_id_field,
            member_name_field,
            carrier_name_field,
            plan_name_field,
            requestor_type_field,
            status_tags,
            carrier_tags,
            requestor_tags,
        })
    }
}

impl JobConfig {
    const DEFAULT_FROM_DATE: &'static str = "2024-01-01";
    const DEFAULT_BATCH_SIZE: i64 = 100;
    const DEFAULT_INTERVAL_SECS: u64 = 60;

    pub fn from_env(prefix: &str) -> Result<Self, String> {
        let enabled = env::var(format!("{}_ENABLED", prefix))
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let from_date = env::var(format!("{}_FROM_DATE", prefix))
            .unwrap_or_else(|_| Self::DEFAULT_FROM_DATE.to_string());
        let from_date = NaiveDate::parse_from_str(&from_date, "%Y-%m-%d")
            .map_err(|_| format!("{}_FROM_DATE must be a YYYY-MM-DD date", prefix))?;

        let batch_size = env::var(format!("{}_COUNT", prefix))
            .unwrap_or_else(|_| Self::DEFAULT_BATCH_SIZE.to_string())
            .parse::<i64>()
            .map_err(|_| format!("{}_COUNT must be a valid number", prefix))?;

        let interval_secs = env::var(format!("{}_INTERVAL_SECS", prefix))
            .unwrap_or_else(|_| Self::DEFAULT_INTERVAL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| format!("{}_INTERVAL_SECS must be a valid number", prefix))?;

        Ok(Self {
            enabled,
            from_date,
            batch_size,
            interval_secs,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Casebridge API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Support case and order change synchronization to Zendesk".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

/// Parses a "key:value,key:value" list into a map. Keys may contain spaces
/// ("Closed Approved"); the first ':' splits key from value.
fn parse_tag_list(raw: &str) -> HashMap<String, String> {
    raw.split(',')
        .filter_map(|pair| {
            let (key, value) = pair.trim().split_once(':')?;
            if key.is_empty() {
                return None;
            }
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_list() {
        let tags = parse_tag_list("New:123, Closed Approved:456,Pending:789");
        assert_eq!(tags.get("New"), Some(&"123".to_string()));
        assert_eq!(tags.get("Closed Approved"), Some(&"456".to_string()));
        assert_eq!(tags.get("Pending"), Some(&"789".to_string()));
    }

    #[test]
    fn test_parse_tag_list_ignores_malformed_entries() {
        let tags = parse_tag_list("New:123,,no-separator,:orphan");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.get("New"), Some(&"123".to_string()));
    }
}
