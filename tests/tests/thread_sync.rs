use agora_client::{
    api::{ChangeEvent, Error, Store, VoteKind, Watch},
    build_tree, CommentNode, ThreadView, VoteState,
};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tests::{comment_id, sample_comment, seeded_store};

fn forest_len(forest: &[CommentNode]) -> usize {
    forest.iter().map(CommentNode::count).sum()
}

#[tokio::test]
async fn rebuild_merge_follows_insert_notifications() {
    let (store, user, _community, post) = seeded_store().await;
    let mut sub = store.subscribe(Watch::Comments).await.unwrap();

    let mut view = ThreadView::new(post.id);
    view.refresh(&store).await.unwrap();
    assert!(view.forest().is_empty());

    store
        .insert_comment(sample_comment(1, user.id, post.id, None, 1))
        .await
        .unwrap();
    store
        .insert_comment(sample_comment(2, user.id, post.id, Some(comment_id(1)), 2))
        .await
        .unwrap();

    for _ in 0..2 {
        let event = sub.events.recv().await.unwrap();
        if view.handle_event(&event) {
            view.refresh(&store).await.unwrap();
        }
    }

    assert_eq!(view.forest().len(), 1);
    assert_eq!(view.forest()[0].comment.id, comment_id(1));
    assert_eq!(view.forest()[0].children.len(), 1);
    assert_eq!(store.test_post(post.id).unwrap().comment_count, 2);
}

#[tokio::test]
async fn notifications_in_either_order_converge() {
    let (store, user, _community, post) = seeded_store().await;
    let root = sample_comment(1, user.id, post.id, None, 1);
    let reply = sample_comment(2, user.id, post.id, Some(root.id), 2);
    store.insert_comment(root.clone()).await.unwrap();
    store.insert_comment(reply.clone()).await.unwrap();

    let e1 = ChangeEvent::CommentInserted(root);
    let e2 = ChangeEvent::CommentInserted(reply);

    let mut forward = ThreadView::new(post.id);
    for e in [&e1, &e2] {
        if forward.handle_event(e) {
            forward.refresh(&store).await.unwrap();
        }
    }
    let mut backward = ThreadView::new(post.id);
    for e in [&e2, &e1] {
        if backward.handle_event(e) {
            backward.refresh(&store).await.unwrap();
        }
    }

    assert_eq!(forward.forest(), backward.forest());
    assert_eq!(forest_len(forward.forest()), 2);
}

#[tokio::test]
async fn failed_refresh_keeps_the_displayed_forest() {
    let (store, user, _community, post) = seeded_store().await;
    store
        .insert_comment(sample_comment(1, user.id, post.id, None, 1))
        .await
        .unwrap();

    let mut view = ThreadView::new(post.id);
    view.refresh(&store).await.unwrap();
    let before = view.forest().to_vec();

    store
        .insert_comment(sample_comment(2, user.id, post.id, None, 2))
        .await
        .unwrap();
    store.fail_next_with(Error::Connection("socket closed".to_string()));
    assert_eq!(
        view.refresh(&store).await,
        Err(Error::Connection("socket closed".to_string()))
    );
    assert_eq!(view.forest(), &before[..]);

    // the next successful refresh catches back up
    view.refresh(&store).await.unwrap();
    assert_eq!(forest_len(view.forest()), 2);
}

#[tokio::test]
async fn displayed_comment_counters_adjust_in_place() {
    let (store, user, _community, post) = seeded_store().await;
    store
        .insert_comment(sample_comment(1, user.id, post.id, None, 1))
        .await
        .unwrap();
    store
        .insert_comment(sample_comment(2, user.id, post.id, Some(comment_id(1)), 2))
        .await
        .unwrap();

    let mut view = ThreadView::new(post.id);
    view.refresh(&store).await.unwrap();

    // optimistic vote on the reply, applied to the displayed node only
    let reply = view.comment_mut(comment_id(2)).unwrap();
    let mut votes = VoteState::of_comment(reply, None);
    votes.cast(VoteKind::Up);
    reply.upvotes = votes.upvotes;
    reply.downvotes = votes.downvotes;

    assert_eq!(view.forest()[0].children[0].comment.score(), 1);
    // the durable record is only touched by the store write
    assert_eq!(store.test_comment(comment_id(2)).unwrap().score(), 0);
}

#[tokio::test]
async fn random_threads_rebuild_deterministically() {
    let mut rng = StdRng::seed_from_u64(42);
    let (store, user, _community, post) = seeded_store().await;

    // every parent picked among already-inserted comments, so no orphans
    let mut ids: Vec<u128> = Vec::new();
    for n in 1..=40u128 {
        let parent = if ids.is_empty() || rng.gen_bool(0.3) {
            None
        } else {
            Some(comment_id(*ids.choose(&mut rng).unwrap()))
        };
        store
            .insert_comment(sample_comment(n, user.id, post.id, parent, n as i64))
            .await
            .unwrap();
        ids.push(n);
    }

    let comments = store.list_comments(post.id).await.unwrap();
    let forest = build_tree(comments.clone());
    assert_eq!(forest_len(&forest), 40);
    assert_eq!(forest, build_tree(comments));

    fn chronological(nodes: &[CommentNode]) {
        for pair in nodes.windows(2) {
            assert!(pair[0].comment.created_at <= pair[1].comment.created_at);
        }
        for n in nodes {
            chronological(&n.children);
        }
    }
    chronological(&forest);
}
