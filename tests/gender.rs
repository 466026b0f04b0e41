//! Integration tests for the gender partition resolver and its lookup cache.

use sportsfest_web::{
    Gender, GenderResolver, InMemoryStore, Participant, Player, Sport, SportType, Store,
    TeamRoster,
};
use std::time::Duration;

const EVENT: u32 = 2026;

fn team(name: &str) -> Participant {
    Participant::Team(name.to_string())
}

fn store_with_team(team_name: &str, gender: Gender) -> (InMemoryStore, Sport) {
    let mut store = InMemoryStore::new();
    let captain = Player::new(format!("{team_name} captain"), gender);
    let mut sport = Sport::new("volleyball", EVENT, SportType::DualTeam);
    sport.teams.push(TeamRoster {
        name: team_name.to_string(),
        players: vec![captain.id],
    });
    store.put_player(captain).unwrap();
    store.put_sport(sport.clone()).unwrap();
    (store, sport)
}

#[test]
fn team_gender_comes_from_its_first_player() {
    let (store, sport) = store_with_team("alpha", Gender::Female);
    let mut resolver = GenderResolver::new();
    assert_eq!(
        resolver.participant_gender(&store, &sport, &team("alpha")),
        Some(Gender::Female)
    );
}

#[test]
fn individual_players_resolve_directly() {
    let mut store = InMemoryStore::new();
    let p = Player::new("runner", Gender::Male);
    let mut sport = Sport::new("athletics", EVENT, SportType::DualPlayer);
    sport.players.push(p.id);
    let id = p.id;
    store.put_player(p).unwrap();
    store.put_sport(sport.clone()).unwrap();

    let mut resolver = GenderResolver::new();
    assert_eq!(
        resolver.participant_gender(&store, &sport, &Participant::Player(id)),
        Some(Gender::Male)
    );
}

#[test]
fn missing_records_resolve_to_none_not_an_error() {
    let (store, sport) = store_with_team("alpha", Gender::Male);
    let mut resolver = GenderResolver::new();
    assert_eq!(
        resolver.participant_gender(&store, &sport, &team("ghost")),
        None
    );
    assert_eq!(
        resolver.participant_gender(&store, &sport, &Participant::Player(uuid::Uuid::new_v4())),
        None
    );

    // A team with an empty roster cannot be classified either.
    let mut empty = sport.clone();
    empty.teams.push(TeamRoster {
        name: "hollow".to_string(),
        players: vec![],
    });
    assert_eq!(
        resolver.participant_gender(&store, &empty, &team("hollow")),
        None
    );
}

#[test]
fn cached_lookups_are_served_until_invalidated() {
    let (mut store, sport) = store_with_team("alpha", Gender::Male);
    let mut resolver = GenderResolver::new();
    assert_eq!(
        resolver.participant_gender(&store, &sport, &team("alpha")),
        Some(Gender::Male)
    );

    // Swap the team's representative player for a woman. The cached bucket
    // survives until the roster-mutation hook fires.
    let replacement = Player::new("new captain", Gender::Female);
    let mut updated = sport.clone();
    updated.teams[0].players = vec![replacement.id];
    store.put_player(replacement).unwrap();
    store.put_sport(updated.clone()).unwrap();

    assert_eq!(
        resolver.participant_gender(&store, &updated, &team("alpha")),
        Some(Gender::Male)
    );
    resolver.invalidate("volleyball", EVENT);
    assert_eq!(
        resolver.participant_gender(&store, &updated, &team("alpha")),
        Some(Gender::Female)
    );
}

#[test]
fn expired_entries_are_looked_up_again() {
    let (mut store, sport) = store_with_team("alpha", Gender::Male);
    let mut resolver = GenderResolver::with_ttl(Duration::ZERO);
    assert_eq!(
        resolver.participant_gender(&store, &sport, &team("alpha")),
        Some(Gender::Male)
    );

    let replacement = Player::new("new captain", Gender::Female);
    let mut updated = sport.clone();
    updated.teams[0].players = vec![replacement.id];
    store.put_player(replacement).unwrap();
    store.put_sport(updated.clone()).unwrap();

    // Zero TTL means every call re-reads the store; no invalidation needed.
    assert_eq!(
        resolver.participant_gender(&store, &updated, &team("alpha")),
        Some(Gender::Female)
    );
}
