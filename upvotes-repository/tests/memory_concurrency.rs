//! Concurrency tests for the in-memory upvotes repository.
//!
//! Toggles are fired from many tasks on a multi-threaded runtime; the
//! persisted points must always equal the number of membership records.

use std::sync::Arc;

use upvotes_repository::{InMemoryUpvotesRepository, UpvotesRepository};
use upvotes_shared::types::{ActorId, VoteState};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_actor_even_toggles_cancel_out() {
    let repository = Arc::new(InMemoryUpvotesRepository::new());
    let post = repository.insert_post().await;
    let actor = ActorId::new("user-1");

    let mut handles = Vec::new();
    for _ in 0..10 {
        let repository = repository.clone();
        let actor = actor.clone();
        handles.push(tokio::spawn(async move {
            repository.toggle_upvote(post, &actor).await
        }));
    }

    let mut upvoted = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_upvoted {
            upvoted += 1;
        }
    }

    // Serialized toggles alternate on/off, so half of them saw an insert.
    assert_eq!(upvoted, 5);
    let state = repository.get_vote_state(post, Some(&actor)).await.unwrap();
    assert_eq!(state, VoteState::new(false, 0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_actors_each_count_once() {
    let repository = Arc::new(InMemoryUpvotesRepository::new());
    let comment = repository.insert_comment().await;

    let mut handles = Vec::new();
    for i in 0..25 {
        let repository = repository.clone();
        handles.push(tokio::spawn(async move {
            let actor = ActorId::new(format!("user-{i}"));
            repository.toggle_upvote(comment, &actor).await
        }));
    }

    let mut max_points = 0;
    for handle in handles {
        let state = handle.await.unwrap().unwrap();
        assert!(state.is_upvoted);
        max_points = max_points.max(state.points);
    }

    assert_eq!(max_points, 25);
    let state = repository.get_vote_state(comment, None).await.unwrap();
    assert_eq!(state.points, 25);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_odd_toggle_count_leaves_actor_upvoted() {
    let repository = Arc::new(InMemoryUpvotesRepository::new());
    let post = repository.insert_post().await;
    let other = repository.insert_post().await;
    let actor = ActorId::new("user-1");

    let mut handles = Vec::new();
    for _ in 0..7 {
        let repository = repository.clone();
        let actor = actor.clone();
        handles.push(tokio::spawn(async move {
            repository.toggle_upvote(post, &actor).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let state = repository.get_vote_state(post, Some(&actor)).await.unwrap();
    assert_eq!(state, VoteState::new(true, 1));
    let untouched = repository.get_vote_state(other, Some(&actor)).await.unwrap();
    assert_eq!(untouched, VoteState::new(false, 0));
}
