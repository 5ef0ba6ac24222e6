use agora_client::{
    api::{Error, Store, VoteKind, VoteTarget},
    VoteState,
};
use tests::{sample_comment, seeded_store};

#[tokio::test]
async fn optimistic_deltas_match_durable_counters() {
    let (store, user, _community, post) = seeded_store().await;
    let target = VoteTarget::Post(post.id);
    let mut local = VoteState::of_post(&post, None);

    local
        .submit(&store, target, user.id, VoteKind::Up)
        .await
        .unwrap();
    let durable = store.test_post(post.id).unwrap();
    assert_eq!(
        (local.upvotes, local.downvotes),
        (durable.upvotes, durable.downvotes)
    );
    assert_eq!(store.test_vote(target, user.id), Some(VoteKind::Up));

    // flip
    local
        .submit(&store, target, user.id, VoteKind::Down)
        .await
        .unwrap();
    let durable = store.test_post(post.id).unwrap();
    assert_eq!(
        (local.upvotes, local.downvotes),
        (durable.upvotes, durable.downvotes)
    );
    assert_eq!(store.test_vote(target, user.id), Some(VoteKind::Down));

    // retract
    local
        .submit(&store, target, user.id, VoteKind::Down)
        .await
        .unwrap();
    let durable = store.test_post(post.id).unwrap();
    assert_eq!((durable.upvotes, durable.downvotes), (0, 0));
    assert_eq!((local.upvotes, local.downvotes), (0, 0));
    assert_eq!(local.mine, None);
    assert_eq!(store.test_vote(target, user.id), None);
}

#[tokio::test]
async fn refused_write_rolls_local_counters_back() {
    let (store, user, _community, post) = seeded_store().await;
    let target = VoteTarget::Post(post.id);
    let mut local = VoteState::of_post(&post, None);

    store.fail_next_with(Error::Connection("gateway timeout".to_string()));
    let err = local
        .submit(&store, target, user.id, VoteKind::Up)
        .await
        .unwrap_err();
    assert_eq!(err, Error::Connection("gateway timeout".to_string()));

    // displayed counters are back to their pre-click values, and nothing
    // durable happened either
    assert_eq!(local, VoteState::of_post(&post, None));
    let durable = store.test_post(post.id).unwrap();
    assert_eq!((durable.upvotes, durable.downvotes), (0, 0));
    assert_eq!(store.test_vote(target, user.id), None);
}

#[tokio::test]
async fn comment_votes_share_the_same_flow() {
    let (store, user, _community, post) = seeded_store().await;
    let comment = sample_comment(1, user.id, post.id, None, 1);
    store.insert_comment(comment.clone()).await.unwrap();

    let target = VoteTarget::Comment(comment.id);
    let mut local = VoteState::of_comment(&comment, None);
    local
        .submit(&store, target, user.id, VoteKind::Up)
        .await
        .unwrap();

    let durable = store.test_comment(comment.id).unwrap();
    assert_eq!((local.upvotes, local.downvotes), (1, 0));
    assert_eq!((durable.upvotes, durable.downvotes), (1, 0));
}

#[tokio::test]
async fn voting_on_a_missing_target_is_an_error() {
    let (store, user, _community, _post) = seeded_store().await;
    let gone = VoteTarget::Comment(tests::comment_id(99));
    let mut local = VoteState::new(0, 0, None);
    assert!(matches!(
        local.submit(&store, gone, user.id, VoteKind::Up).await,
        Err(Error::NotFound(_))
    ));
    assert_eq!(local, VoteState::new(0, 0, None));
}
