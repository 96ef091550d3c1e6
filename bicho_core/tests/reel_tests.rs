mod common;

use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};
use tokio::time::Instant;

use bicho_core::{factor, Reel, ReelState, SettledBy, SymbolCache, VISIBLE_ROWS};
use common::{Animation, FakeReel, TokioTimer};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn reel(index: usize, animation: Animation, cache: &mut SymbolCache) -> Reel<FakeReel> {
    let initial = names(&["gato", "galo", "leao", "urso", "vaca"]);
    Reel::new(index, FakeReel::new(animation), &initial, cache)
}

#[test]
fn factor_matches_formula_and_grows() {
    assert_eq!(factor(0), 1.0);
    assert_eq!(factor(1), 1.25);
    assert_eq!(factor(2), 2.0);
    assert_eq!(factor(3), 3.25);
    assert_eq!(factor(4), 5.0);
    for i in 0..50 {
        assert!(factor(i + 1) > factor(i));
    }
}

#[test]
fn render_appends_filler_then_window() {
    let mut cache = SymbolCache::new();
    let mut rng = StdRng::seed_from_u64(1);
    let expected = [25, 25, 50, 75, 125];
    for (index, len) in expected.into_iter().enumerate() {
        let mut r = reel(index, Animation::Completes(0.5), &mut cache);
        assert_eq!(r.render_len(), len);
        let next = names(&["tigre", "touro", "cobra", "peru", "aguia"]);
        r.render_symbols(&next, &mut cache, &mut rng);
        assert_eq!(r.strip().len(), VISIBLE_ROWS + len);
        assert_eq!(&r.symbol_names()[r.strip().len() - 5..], next.as_slice());
        assert_eq!(r.surface().entries, r.symbol_names());
    }
}

#[tokio::test(start_paused = true)]
async fn spin_keeps_only_the_new_window() {
    let mut cache = SymbolCache::new();
    let mut rng = StdRng::seed_from_u64(2);
    let mut r = reel(3, Animation::Completes(0.5), &mut cache);
    let next = names(&["tigre", "touro", "cobra", "peru", "aguia"]);
    r.render_symbols(&next, &mut cache, &mut rng);

    let by = r.spin(&TokioTimer).await;

    assert_eq!(by, SettledBy::Animation);
    assert_eq!(r.state(), ReelState::Settled);
    assert_eq!(r.symbol_names(), next);
    assert_eq!(r.surface().entries, next);
    assert_eq!(r.surface().forced_finishes, 0);
}

#[tokio::test(start_paused = true)]
async fn short_column_is_padded_randomly() {
    let mut cache = SymbolCache::new();
    let mut rng = StdRng::seed_from_u64(3);
    let mut r = reel(0, Animation::Completes(0.5), &mut cache);
    r.render_symbols(&names(&["tigre", "touro"]), &mut cache, &mut rng);
    r.spin(&TokioTimer).await;

    let shown = r.symbol_names();
    assert_eq!(shown.len(), VISIBLE_ROWS);
    assert_eq!(&shown[..2], &names(&["tigre", "touro"])[..]);
}

#[tokio::test(start_paused = true)]
async fn stalled_animation_is_settled_by_the_fallback_timer() {
    let mut cache = SymbolCache::new();
    let mut rng = StdRng::seed_from_u64(4);
    let mut r = reel(2, Animation::Stalls, &mut cache);
    r.render_symbols(&names(&["a", "b", "c", "d", "e"]), &mut cache, &mut rng);

    let started = Instant::now();
    let by = r.spin(&TokioTimer).await;

    assert_eq!(by, SettledBy::Timeout);
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(2) && waited < Duration::from_millis(2_010));
    assert_eq!(r.surface().forced_finishes, 1);
    assert_eq!(r.symbol_names(), names(&["a", "b", "c", "d", "e"]));
}

#[tokio::test(start_paused = true)]
async fn each_spin_cancels_before_playing() {
    let mut cache = SymbolCache::new();
    let mut rng = StdRng::seed_from_u64(5);
    let mut r = reel(1, Animation::Completes(0.25), &mut cache);
    let cancels_at_start = r.surface().cancels;
    for _ in 0..3 {
        r.render_symbols(&names(&["gato"; 5]), &mut cache, &mut rng);
        r.spin(&TokioTimer).await;
    }
    assert_eq!(r.surface().plays, 3);
    assert_eq!(r.surface().cancels, cancels_at_start + 3);
    assert_eq!(r.strip().len(), VISIBLE_ROWS);
}

#[test]
fn motion_scales_with_factor() {
    let mut cache = SymbolCache::new();
    let r = reel(4, Animation::Stalls, &mut cache);
    let motion = r.motion();
    assert_eq!(motion.duration, Duration::from_secs(5));
    assert_eq!(motion.windows, 25.0);
}

#[test]
fn highlight_row_replaces_previous_marker() {
    let mut cache = SymbolCache::new();
    let mut r = reel(0, Animation::Stalls, &mut cache);
    r.highlight_row(1);
    r.highlight_row(3);
    assert_eq!(r.highlighted_rows().collect::<Vec<_>>(), vec![3]);
    assert_eq!(r.surface().highlights.iter().copied().collect::<Vec<_>>(), vec![3]);

    r.highlight_row(9);
    assert_eq!(r.highlighted_rows().count(), 0);
    assert!(r.surface().highlights.is_empty());
}

#[test]
fn mark_win_accumulates() {
    let mut cache = SymbolCache::new();
    let mut r = reel(0, Animation::Stalls, &mut cache);
    assert!(r.mark_win(0));
    assert!(r.mark_win(4));
    assert!(!r.mark_win(5));
    assert_eq!(r.highlighted_rows().collect::<Vec<_>>(), vec![0, 4]);
}
