use super::agents::{Agent, AgentDirectory};

/// Sellers are shown at most this many agents per suburb.
pub const MAX_SUBURB_MATCHES: usize = 3;

/// Criterion deciding which agents may backfill a suburb with too few
/// specific matches: a recent-sales floor, or membership in an agency that
/// operates across the whole coverage area.
#[derive(Debug, Clone)]
pub struct GeneralistPolicy {
    pub min_recent_sales: u32,
    pub multi_area_agencies: Vec<String>,
}

impl GeneralistPolicy {
    pub fn new(min_recent_sales: u32, multi_area_agencies: Vec<String>) -> Self {
        Self {
            min_recent_sales,
            multi_area_agencies,
        }
    }

    pub fn is_generalist(&self, agent: &Agent) -> bool {
        agent.stats.recent_sales >= self.min_recent_sales
            || self
                .multi_area_agencies
                .iter()
                .any(|agency| agency == &agent.agency)
    }
}

impl Default for GeneralistPolicy {
    fn default() -> Self {
        Self::new(
            20,
            vec!["Leadhome".to_string(), "Seeff Sandton".to_string()],
        )
    }
}

/// Rank up to [`MAX_SUBURB_MATCHES`] agents for a suburb.
///
/// Agents listing the suburb are ordered by their suburb-scoped priority
/// (stable, so dataset order breaks ties). When fewer than the maximum match,
/// the remainder is backfilled from generalists ordered by recent sales.
/// An unknown slug simply yields zero specific matches and falls through to
/// the generalist path. Pure and deterministic for a fixed dataset.
pub fn agents_for_suburb<'a>(
    directory: &'a AgentDirectory,
    suburb_slug: &str,
    policy: &GeneralistPolicy,
) -> Vec<&'a Agent> {
    let mut specific: Vec<(&Agent, u8)> = directory
        .all()
        .iter()
        .filter(|agent| agent.active)
        .filter_map(|agent| {
            agent
                .suburbs
                .get(suburb_slug)
                .map(|profile| (agent, profile.priority))
        })
        .collect();
    specific.sort_by_key(|(_, priority)| *priority);

    let mut matches: Vec<&Agent> = specific
        .into_iter()
        .map(|(agent, _)| agent)
        .take(MAX_SUBURB_MATCHES)
        .collect();

    if matches.len() < MAX_SUBURB_MATCHES {
        let mut backfill: Vec<&Agent> = directory
            .all()
            .iter()
            .filter(|agent| agent.active)
            .filter(|agent| !agent.suburbs.contains_key(suburb_slug))
            .filter(|agent| policy.is_generalist(agent))
            .collect();
        backfill.sort_by(|a, b| b.stats.recent_sales.cmp(&a.stats.recent_sales));

        for agent in backfill {
            if matches.len() == MAX_SUBURB_MATCHES {
                break;
            }
            matches.push(agent);
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::reference::agents::{AgentContacts, AgentStats, SuburbProfile};

    fn agent(id: &str, agency: &str, recent_sales: u32, suburbs: &[(&str, u8)]) -> Agent {
        Agent {
            id: id.to_string(),
            slug: id.to_string(),
            name: id.to_string(),
            agency: agency.to_string(),
            rating: 4.5,
            active: true,
            tier: None,
            why_recommended: Vec::new(),
            stats: AgentStats {
                years_experience: 10,
                recent_sales,
                avg_price: "R3.0m".to_string(),
                est_days_on_market: None,
            },
            contacts: AgentContacts {
                phone: "+27 80 000 0000".to_string(),
                email: format!("{id}@example.co.za"),
                whatsapp: None,
            },
            website: None,
            suburbs: suburbs
                .iter()
                .map(|(slug, priority)| {
                    (
                        slug.to_string(),
                        SuburbProfile {
                            priority: *priority,
                            badge: None,
                        },
                    )
                })
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn ids(matches: &[&Agent]) -> Vec<String> {
        matches.iter().map(|agent| agent.id.clone()).collect()
    }

    #[test]
    fn ranks_specific_matches_by_suburb_priority() {
        // B inserted before A so priority, not dataset order, must decide.
        let directory = AgentDirectory::from_agents(vec![
            agent("b", "Acme", 5, &[("sandown", 2)]),
            agent("a", "Acme", 5, &[("sandown", 1)]),
            agent("c", "Acme", 5, &[("sandown", 3)]),
        ]);

        let matches = agents_for_suburb(&directory, "sandown", &GeneralistPolicy::default());
        assert_eq!(ids(&matches), vec!["a", "b", "c"]);
    }

    #[test]
    fn is_deterministic_across_calls() {
        let directory = AgentDirectory::from_agents(vec![
            agent("a", "Acme", 30, &[("sandown", 1)]),
            agent("b", "Acme", 25, &[]),
            agent("c", "Acme", 40, &[]),
        ]);
        let policy = GeneralistPolicy::default();

        let first = ids(&agents_for_suburb(&directory, "sandown", &policy));
        let second = ids(&agents_for_suburb(&directory, "sandown", &policy));
        assert_eq!(first, second);
    }

    #[test]
    fn backfills_entirely_from_generalists_when_no_specific_match() {
        let directory = AgentDirectory::from_agents(vec![
            agent("low", "Acme", 21, &[]),
            agent("high", "Acme", 40, &[]),
            agent("mid", "Acme", 30, &[]),
            agent("below-floor", "Acme", 3, &[]),
        ]);

        let matches = agents_for_suburb(&directory, "unknown-suburb", &GeneralistPolicy::default());
        assert_eq!(ids(&matches), vec!["high", "mid", "low"]);
    }

    #[test]
    fn priority_in_one_suburb_never_leaks_into_another() {
        let directory = AgentDirectory::from_agents(vec![
            agent("a", "Acme", 5, &[("x", 1), ("y", 3)]),
            agent("b", "Acme", 5, &[("x", 2)]),
            agent("c", "Acme", 5, &[("y", 1)]),
        ]);
        let policy = GeneralistPolicy::new(u32::MAX, Vec::new());

        assert_eq!(ids(&agents_for_suburb(&directory, "x", &policy)), vec!["a", "b"]);
        assert_eq!(ids(&agents_for_suburb(&directory, "y", &policy)), vec!["c", "a"]);
    }

    #[test]
    fn appends_generalists_after_specific_matches() {
        let directory = AgentDirectory::from_agents(vec![
            agent("general", "Leadhome", 2, &[]),
            agent("specific", "Acme", 1, &[("parkmore", 4)]),
            agent("busy", "Acme", 50, &[]),
        ]);

        let matches = agents_for_suburb(&directory, "parkmore", &GeneralistPolicy::default());
        assert_eq!(ids(&matches), vec!["specific", "busy", "general"]);
    }

    #[test]
    fn inactive_agents_are_never_recommended() {
        let mut retired = agent("retired", "Acme", 60, &[("sandown", 1)]);
        retired.active = false;
        let directory =
            AgentDirectory::from_agents(vec![retired, agent("a", "Acme", 25, &[("sandown", 2)])]);

        let matches = agents_for_suburb(&directory, "sandown", &GeneralistPolicy::default());
        assert_eq!(ids(&matches), vec!["a"]);
    }

    #[test]
    fn empty_pool_yields_empty_list() {
        let directory = AgentDirectory::from_agents(Vec::new());
        assert!(agents_for_suburb(&directory, "sandown", &GeneralistPolicy::default()).is_empty());
    }
}
