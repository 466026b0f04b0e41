//! Integration tests for the eligibility tracker: eliminated and locked
//! sets derived from knockout/final history.

use chrono::NaiveDate;
use sportsfest_web::logic::eligibility;
use sportsfest_web::{
    create_match, update_match, CreateMatchRequest, EventWindow, Gender, GenderResolver,
    InMemoryStore, MatchStatus, MatchType, Participant, Player, Qualifier, Sport, SportType,
    Store, TeamRoster, UpdateMatchRequest,
};

const EVENT: u32 = 2026;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, day).unwrap()
}

fn team(name: &str) -> Participant {
    Participant::Team(name.to_string())
}

struct Fixture {
    store: InMemoryStore,
    genders: GenderResolver,
}

fn dual_team_fixture(teams: &[(&str, Gender)]) -> Fixture {
    let mut store = InMemoryStore::new();
    store
        .put_event_window(
            EVENT,
            EventWindow {
                start: date(1),
                end: date(31),
            },
        )
        .unwrap();
    let mut sport = Sport::new("kabaddi", EVENT, SportType::DualTeam);
    for (name, gender) in teams {
        let captain = Player::new(format!("{name} captain"), *gender);
        sport.teams.push(TeamRoster {
            name: (*name).to_string(),
            players: vec![captain.id],
        });
        store.put_player(captain).unwrap();
    }
    store.put_sport(sport).unwrap();
    Fixture {
        store,
        genders: GenderResolver::new(),
    }
}

fn multi_player_fixture(n: usize) -> (Fixture, Vec<Participant>) {
    let mut store = InMemoryStore::new();
    store
        .put_event_window(
            EVENT,
            EventWindow {
                start: date(1),
                end: date(31),
            },
        )
        .unwrap();
    let mut sport = Sport::new("swimming", EVENT, SportType::MultiPlayer);
    let mut participants = Vec::new();
    for i in 0..n {
        let p = Player::new(format!("swimmer {i}"), Gender::Male);
        sport.players.push(p.id);
        participants.push(Participant::Player(p.id));
        store.put_player(p).unwrap();
    }
    store.put_sport(sport).unwrap();
    (
        Fixture {
            store,
            genders: GenderResolver::new(),
        },
        participants,
    )
}

fn knockout(f: &mut Fixture, sport: &str, participants: Vec<Participant>, day: u32) -> u32 {
    create_match(
        &mut f.store,
        &mut f.genders,
        CreateMatchRequest {
            sport: sport.to_string(),
            event: EVENT,
            match_type: MatchType::Knockout,
            participants,
            match_date: date(day),
        },
    )
    .unwrap()
    .seq
}

fn resolve(f: &mut Fixture, sport: &str, seq: u32, req: UpdateMatchRequest) {
    update_match(&mut f.store, sport, EVENT, seq, req, date(20)).unwrap();
}

#[test]
fn dual_knockout_eliminates_everyone_but_the_winner() {
    let mut f = dual_team_fixture(&[
        ("alpha", Gender::Male),
        ("bravo", Gender::Male),
        ("delta", Gender::Male),
    ]);
    let seq = knockout(&mut f, "kabaddi", vec![team("alpha"), team("bravo")], 10);
    resolve(
        &mut f,
        "kabaddi",
        seq,
        UpdateMatchRequest {
            status: Some(MatchStatus::Completed),
            winner: Some(team("bravo")),
            ..Default::default()
        },
    );

    let sport = f.store.sport("kabaddi", EVENT).unwrap();
    let out = eligibility::eliminated(&f.store, &mut f.genders, &sport, Gender::Male);
    assert!(out.contains(&team("alpha")));
    assert!(!out.contains(&team("bravo")));
    assert!(!out.contains(&team("delta")));
}

#[test]
fn multi_knockout_eliminates_non_qualifiers() {
    let (mut f, players) = multi_player_fixture(5);
    let seq = knockout(&mut f, "swimming", players[..4].to_vec(), 10);
    resolve(
        &mut f,
        "swimming",
        seq,
        UpdateMatchRequest {
            status: Some(MatchStatus::Completed),
            qualifiers: Some(vec![
                Qualifier {
                    position: 1,
                    participant: players[0].clone(),
                },
                Qualifier {
                    position: 2,
                    participant: players[1].clone(),
                },
            ]),
            ..Default::default()
        },
    );

    let sport = f.store.sport("swimming", EVENT).unwrap();
    let out = eligibility::eliminated(&f.store, &mut f.genders, &sport, Gender::Male);
    assert!(!out.contains(&players[0]));
    assert!(!out.contains(&players[1]));
    assert!(out.contains(&players[2]));
    assert!(out.contains(&players[3]));
    // Player 4 never swam, so nothing eliminated them.
    assert!(!out.contains(&players[4]));
}

#[test]
fn completed_multi_match_without_qualifiers_eliminates_all_participants() {
    let (mut f, players) = multi_player_fixture(4);
    let seq = knockout(&mut f, "swimming", players[..3].to_vec(), 10);
    resolve(
        &mut f,
        "swimming",
        seq,
        UpdateMatchRequest {
            status: Some(MatchStatus::Completed),
            qualifiers: Some(vec![]),
            ..Default::default()
        },
    );

    let sport = f.store.sport("swimming", EVENT).unwrap();
    let out = eligibility::eliminated(&f.store, &mut f.genders, &sport, Gender::Male);
    for p in &players[..3] {
        assert!(out.contains(p));
    }
}

#[test]
fn scheduled_knockouts_lock_their_participants() {
    let mut f = dual_team_fixture(&[
        ("alpha", Gender::Male),
        ("bravo", Gender::Male),
        ("delta", Gender::Male),
        ("echo", Gender::Male),
    ]);
    knockout(&mut f, "kabaddi", vec![team("alpha"), team("bravo")], 10);

    let sport = f.store.sport("kabaddi", EVENT).unwrap();
    let locked = eligibility::locked(&f.store, &mut f.genders, &sport, Gender::Male);
    assert!(locked.contains(&team("alpha")));
    assert!(locked.contains(&team("bravo")));
    assert!(!locked.contains(&team("delta")));
}

#[test]
fn drawn_and_cancelled_knockouts_lock_nothing() {
    let mut f = dual_team_fixture(&[
        ("alpha", Gender::Male),
        ("bravo", Gender::Male),
        ("delta", Gender::Male),
    ]);
    let seq = knockout(&mut f, "kabaddi", vec![team("alpha"), team("bravo")], 10);
    resolve(
        &mut f,
        "kabaddi",
        seq,
        UpdateMatchRequest {
            status: Some(MatchStatus::Draw),
            ..Default::default()
        },
    );

    let sport = f.store.sport("kabaddi", EVENT).unwrap();
    let locked = eligibility::locked(&f.store, &mut f.genders, &sport, Gender::Male);
    let eliminated = eligibility::eliminated(&f.store, &mut f.genders, &sport, Gender::Male);
    assert!(locked.is_empty());
    assert!(eliminated.is_empty());
}

#[test]
fn eligible_filters_by_gender_and_excludes_eliminated_and_locked() {
    let mut f = dual_team_fixture(&[
        ("alpha", Gender::Male),
        ("bravo", Gender::Male),
        ("delta", Gender::Male),
        ("echo", Gender::Male),
        ("rose", Gender::Female),
        ("lily", Gender::Female),
    ]);
    let seq = knockout(&mut f, "kabaddi", vec![team("alpha"), team("bravo")], 10);
    resolve(
        &mut f,
        "kabaddi",
        seq,
        UpdateMatchRequest {
            status: Some(MatchStatus::Completed),
            winner: Some(team("alpha")),
            ..Default::default()
        },
    );
    knockout(&mut f, "kabaddi", vec![team("delta"), team("echo")], 12);

    let sport = f.store.sport("kabaddi", EVENT).unwrap();
    let eligible = eligibility::eligible(&f.store, &mut f.genders, &sport, Gender::Male);
    // bravo eliminated, delta and echo locked.
    assert_eq!(eligible, vec![team("alpha")]);

    // The women's bracket is untouched by men's results.
    let eligible = eligibility::eligible(&f.store, &mut f.genders, &sport, Gender::Female);
    assert_eq!(eligible, vec![team("rose"), team("lily")]);
}

#[test]
fn eligible_skips_roster_entries_with_no_resolvable_gender() {
    let mut f = dual_team_fixture(&[("alpha", Gender::Male), ("bravo", Gender::Male)]);
    let mut sport = f.store.sport("kabaddi", EVENT).unwrap();
    // A captain who was never registered leaves the team's gender unknown.
    sport.teams.push(TeamRoster {
        name: "ghost".to_string(),
        players: vec![Player::new("nobody", Gender::Male).id],
    });
    f.store.put_sport(sport.clone()).unwrap();

    let eligible = eligibility::eligible(&f.store, &mut f.genders, &sport, Gender::Male);
    assert_eq!(eligible, vec![team("alpha"), team("bravo")]);
}

#[test]
fn league_matches_never_eliminate_or_lock() {
    let mut f = dual_team_fixture(&[("alpha", Gender::Male), ("bravo", Gender::Male)]);
    create_match(
        &mut f.store,
        &mut f.genders,
        CreateMatchRequest {
            sport: "kabaddi".to_string(),
            event: EVENT,
            match_type: MatchType::League,
            participants: vec![team("alpha"), team("bravo")],
            match_date: date(10),
        },
    )
    .unwrap();
    resolve(
        &mut f,
        "kabaddi",
        1,
        UpdateMatchRequest {
            status: Some(MatchStatus::Completed),
            winner: Some(team("alpha")),
            ..Default::default()
        },
    );

    let sport = f.store.sport("kabaddi", EVENT).unwrap();
    let snap = eligibility::snapshot(&f.store, &mut f.genders, &sport, Gender::Male);
    assert!(snap.eliminated.is_empty());
    assert!(snap.locked.is_empty());
}
