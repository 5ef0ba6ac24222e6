//! Typed page-level queries and submissions, for a presentation layer to
//! compose. Pure delegation to the injected [`Store`]; no hidden state.

use crate::{
    api::{
        ChatMessage, Comment, Community, Error, IdentityProvider, Post, PostId, PostScope,
        Profile, Store, UserId,
    },
    build_tree, CommentNode,
};

/// The signed-in user's id, required before any submission; anonymous
/// visitors get `PermissionDenied`, which the pages render as their
/// "log in to ..." prompts.
pub async fn require_login<I: IdentityProvider>(ident: &I) -> Result<UserId, Error> {
    ident.current_user().await?.ok_or(Error::PermissionDenied)
}

/// Everything the post page shows: the post and its threaded comments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PostPage {
    pub post: Post,
    pub comments: Vec<CommentNode>,
}

pub async fn post_page<S: Store>(store: &S, post: PostId) -> Result<PostPage, Error> {
    let post = store.fetch_post(post).await?;
    let comments = build_tree(store.list_comments(post.id).await?);
    Ok(PostPage { post, comments })
}

/// The front page feed, newest first
pub async fn front_page<S: Store>(store: &S) -> Result<Vec<Post>, Error> {
    store.list_posts(PostScope::FrontPage).await
}

/// The community page: the community record and its posts, newest first.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommunityPage {
    pub community: Community,
    pub posts: Vec<Post>,
}

pub async fn community_page<S: Store>(store: &S, name: &str) -> Result<CommunityPage, Error> {
    let community = store.fetch_community(name).await?;
    let posts = store.list_posts(PostScope::Community(community.id)).await?;
    Ok(CommunityPage { community, posts })
}

/// The profile page: the user, their posts and their comments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProfilePage {
    pub profile: Profile,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
}

pub async fn profile_page<S: Store>(store: &S, username: &str) -> Result<ProfilePage, Error> {
    let profile = store.fetch_profile(username).await?;
    let posts = store.list_posts(PostScope::Author(profile.id)).await?;
    let comments = store.list_comments_by(profile.id).await?;
    Ok(ProfilePage {
        profile,
        posts,
        comments,
    })
}

/// The sidebar's community directory, largest first
pub async fn top_communities<S: Store>(store: &S, limit: usize) -> Result<Vec<Community>, Error> {
    store.list_communities(Some(limit)).await
}

pub async fn submit_post<S: Store>(store: &S, post: Post) -> Result<(), Error> {
    post.validate()?;
    store.insert_post(post).await
}

pub async fn submit_comment<S: Store>(store: &S, comment: Comment) -> Result<(), Error> {
    comment.validate()?;
    store.insert_comment(comment).await
}

pub async fn submit_message<S: Store>(store: &S, message: ChatMessage) -> Result<(), Error> {
    message.validate()?;
    store.insert_message(message).await
}

pub async fn create_community<S: Store>(store: &S, community: Community) -> Result<(), Error> {
    community.validate()?;
    store.insert_community(community).await
}
