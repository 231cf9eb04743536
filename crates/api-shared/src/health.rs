use crate::models::HealthRes;

/// Health check shared by the REST server and the CLI.
///
/// Reports liveness together with the size of the loaded catalog, so a probe also tells you the
/// catalog was actually read.
#[derive(Clone, Copy, Debug, Default)]
pub struct HealthService;

impl HealthService {
    /// Builds the health response for a service with the given catalog size.
    pub fn check_health(allergens: usize, ingredients: usize) -> HealthRes {
        HealthRes {
            ok: true,
            message: format!(
                "dishcheck is alive ({allergens} allergens, {ingredients} ingredients)"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_health_reports_catalog_size() {
        let res = HealthService::check_health(14, 27);
        assert!(res.ok);
        assert!(res.message.contains("14 allergens"));
        assert!(res.message.contains("27 ingredients"));
    }
}
