use agora_client::{
    api::{Error, IdentityProvider, Store},
    fetch,
};
use agora_mock_store::MockStore;
use tests::{
    comment_id, sample_comment, sample_community, sample_post, sample_profile, seeded_store,
    user_id,
};

#[tokio::test]
async fn post_page_builds_the_thread() {
    let (store, user, _community, post) = seeded_store().await;
    store
        .insert_comment(sample_comment(1, user.id, post.id, None, 1))
        .await
        .unwrap();
    store
        .insert_comment(sample_comment(2, user.id, post.id, Some(comment_id(1)), 2))
        .await
        .unwrap();

    let page = fetch::post_page(&store, post.id).await.unwrap();
    assert_eq!(page.post.comment_count, 2);
    assert_eq!(page.comments.len(), 1);
    assert_eq!(page.comments[0].children.len(), 1);
}

#[tokio::test]
async fn listings_are_newest_first() {
    let (store, user, community, post) = seeded_store().await;
    let newer = sample_post(2, user.id, community.id, 10);
    store.insert_post(newer.clone()).await.unwrap();

    let front = fetch::front_page(&store).await.unwrap();
    assert_eq!(
        front.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![newer.id, post.id]
    );

    let page = fetch::community_page(&store, &community.name).await.unwrap();
    assert_eq!(page.community.id, community.id);
    assert_eq!(page.posts.len(), 2);

    assert!(matches!(
        fetch::community_page(&store, "nosuchplace").await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn profile_page_gathers_their_activity() {
    let (store, user, community, post) = seeded_store().await;
    let other = sample_profile(2, "grace");
    store.insert_profile(other.clone()).await.unwrap();
    store
        .insert_post(sample_post(2, other.id, community.id, 5))
        .await
        .unwrap();
    store
        .insert_comment(sample_comment(1, other.id, post.id, None, 1))
        .await
        .unwrap();
    store
        .insert_comment(sample_comment(2, user.id, post.id, None, 2))
        .await
        .unwrap();

    let page = fetch::profile_page(&store, "grace").await.unwrap();
    assert_eq!(page.profile.id, other.id);
    assert_eq!(page.posts.len(), 1);
    assert_eq!(page.comments.len(), 1);
    assert_eq!(page.comments[0].author_id, other.id);
}

#[tokio::test]
async fn membership_maintains_member_count() {
    let (store, user, community, _post) = seeded_store().await;

    store.join_community(community.id, user.id).await.unwrap();
    // joining twice is not two memberships
    store.join_community(community.id, user.id).await.unwrap();
    assert_eq!(
        store
            .fetch_community(&community.name)
            .await
            .unwrap()
            .member_count,
        1
    );

    store.leave_community(community.id, user.id).await.unwrap();
    store.leave_community(community.id, user.id).await.unwrap();
    assert_eq!(
        store
            .fetch_community(&community.name)
            .await
            .unwrap()
            .member_count,
        0
    );
}

#[tokio::test]
async fn top_communities_ranks_by_members_and_truncates() {
    let (store, user, _first, _post) = seeded_store().await;
    let second = sample_community(2, user.id, "gardening");
    let third = sample_community(3, user.id, "trains");
    store.insert_community(second.clone()).await.unwrap();
    store.insert_community(third.clone()).await.unwrap();

    for n in 10..13 {
        store.join_community(second.id, user_id(n)).await.unwrap();
    }
    store.join_community(third.id, user_id(10)).await.unwrap();

    let top = fetch::top_communities(&store, 2).await.unwrap();
    assert_eq!(
        top.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![second.id, third.id]
    );
}

#[tokio::test]
async fn identity_is_injected_not_ambient() {
    let store = MockStore::new();
    assert_eq!(store.current_user().await.unwrap(), None);
    assert_eq!(
        fetch::require_login(&store).await,
        Err(Error::PermissionDenied)
    );

    store.login_as(Some(user_id(7)));
    assert_eq!(store.current_user().await.unwrap(), Some(user_id(7)));
    assert_eq!(fetch::require_login(&store).await, Ok(user_id(7)));
}

#[tokio::test]
async fn community_names_must_be_url_safe() {
    let (store, user, _community, _post) = seeded_store().await;
    let mut bad = sample_community(9, user.id, "rust aceans");
    assert!(matches!(
        fetch::create_community(&store, bad.clone()).await,
        Err(Error::InvalidName(_))
    ));
    bad.name = "Rustaceans".to_string();
    assert!(matches!(
        fetch::create_community(&store, bad).await,
        Err(Error::InvalidName(_))
    ));
}
