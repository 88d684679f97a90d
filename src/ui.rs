use crate::day::CalendarDay;
use crate::progress::Goals;

/// Radius of the progress rings, also used by the page script.
pub const RING_RADIUS: f64 = 52.0;

pub fn render_index(day: &CalendarDay, goals: &Goals) -> String {
    INDEX_HTML
        .replace("{{DATE}}", &day.date().format("%A, %e %B %Y").to_string())
        .replace("{{PUSHUP_GOAL}}", &goals.pushups.to_string())
        .replace("{{PULLUP_GOAL}}", &goals.pullups.to_string())
        .replace("{{RING_RADIUS}}", &RING_RADIUS.to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Fit Tracker</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef4f1;
      --bg-2: #b9e4cf;
      --ink: #23302b;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --ring-track: rgba(47, 72, 88, 0.12);
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #dff3ea 60%, #f4faf7 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .hidden {
      display: none !important;
    }

    .app,
    .auth-card {
      width: min(860px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    .auth-card {
      width: min(420px, 100%);
      gap: 14px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      justify-content: space-between;
      align-items: flex-start;
      gap: 12px;
    }

    h1, h2 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      margin: 0;
    }

    h1 {
      font-size: clamp(2rem, 4vw, 2.6rem);
    }

    .subtitle {
      margin: 4px 0 0;
      color: #5f6b66;
    }

    input {
      width: 100%;
      padding: 12px 14px;
      border-radius: 14px;
      border: 1px solid rgba(47, 72, 88, 0.18);
      font: inherit;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.secondary {
      background: var(--accent-2);
    }

    button.link {
      background: none;
      color: var(--accent-2);
      padding: 0;
      text-decoration: underline;
    }

    .exercises {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(240px, 1fr));
      gap: 18px;
    }

    .exercise {
      background: white;
      border-radius: 20px;
      padding: 20px;
      display: grid;
      gap: 12px;
      justify-items: center;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .ring-wrap {
      position: relative;
      width: 140px;
      height: 140px;
    }

    .ring-wrap svg {
      transform: rotate(-90deg);
    }

    .ring-track {
      fill: none;
      stroke: var(--ring-track);
      stroke-width: 12;
    }

    .ring {
      fill: none;
      stroke: var(--accent);
      stroke-width: 12;
      stroke-linecap: round;
      transition: stroke-dashoffset 400ms ease;
    }

    .pullups-ring {
      stroke: var(--accent-2);
    }

    .ring-label {
      position: absolute;
      inset: 0;
      display: grid;
      place-items: center;
      text-align: center;
      font-size: 0.85rem;
      color: #6b645d;
    }

    .ring-label strong {
      display: block;
      font-size: 1.8rem;
      color: var(--ink);
    }

    .add-row {
      display: flex;
      gap: 8px;
      width: 100%;
    }

    .streak {
      display: flex;
      gap: 18px;
      color: #5f6b66;
    }

    .tabs {
      display: flex;
      gap: 6px;
      padding: 6px;
      background: rgba(47, 72, 88, 0.08);
      border-radius: 999px;
      width: fit-content;
    }

    .tab {
      background: transparent;
      color: #6b645d;
      padding: 8px 14px;
    }

    .tab.active {
      background: white;
      color: var(--accent-2);
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      text-align: left;
      padding: 8px 6px;
      border-bottom: 1px solid rgba(47, 72, 88, 0.08);
    }

    .status {
      min-height: 1.2em;
      font-size: 0.95rem;
      color: #6b645d;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }
  </style>
</head>
<body>
  <section id="login-overlay" class="auth-card">
    <h2 id="auth-title">Sign in</h2>
    <p id="auth-subtitle" class="subtitle">Welcome back!</p>
    <form id="email-form" class="auth-card" style="padding:0;box-shadow:none;background:none">
      <input id="email" type="email" placeholder="Email" required />
      <input id="nickname" class="hidden" type="text" placeholder="Nickname" />
      <input id="password" type="password" placeholder="Password" required />
      <input id="confirm-password" class="hidden" type="password" placeholder="Confirm password" />
      <button id="auth-submit-btn" type="submit">Sign in</button>
    </form>
    <div id="auth-error" class="status" data-type="error"></div>
    <p class="subtitle">
      <span id="auth-toggle-text">No account yet?</span>
      <button id="auth-toggle-btn" class="link" type="button">Sign up</button>
    </p>
  </section>

  <main id="main-content" class="app hidden">
    <header>
      <div>
        <h1>Fit Tracker</h1>
        <p id="current-date" class="subtitle">{{DATE}}</p>
        <p class="subtitle">Hi, <span id="nickname-label"></span></p>
      </div>
      <button id="logout-btn" class="secondary" type="button">Sign out</button>
    </header>

    <section class="exercises">
      <div class="exercise" data-exercise="pushups">
        <h2>Pushups</h2>
        <div class="ring-wrap">
          <svg width="140" height="140">
            <circle class="ring-track" cx="70" cy="70" r="{{RING_RADIUS}}" />
            <circle class="ring pushups-ring" cx="70" cy="70" r="{{RING_RADIUS}}" />
          </svg>
          <div class="ring-label"><div><strong id="pushups-remaining">{{PUSHUP_GOAL}}</strong>left</div></div>
        </div>
        <p class="subtitle">Done <span id="pushups-done">0</span> / {{PUSHUP_GOAL}}</p>
        <div class="add-row">
          <input id="pushups-input" type="number" min="1" placeholder="How many?" />
          <button id="add-pushups" type="button">Add</button>
        </div>
      </div>
      <div class="exercise" data-exercise="pullups">
        <h2>Pullups</h2>
        <div class="ring-wrap">
          <svg width="140" height="140">
            <circle class="ring-track" cx="70" cy="70" r="{{RING_RADIUS}}" />
            <circle class="ring pullups-ring" cx="70" cy="70" r="{{RING_RADIUS}}" />
          </svg>
          <div class="ring-label"><div><strong id="pullups-remaining">{{PULLUP_GOAL}}</strong>left</div></div>
        </div>
        <p class="subtitle">Done <span id="pullups-done">0</span> / {{PULLUP_GOAL}}</p>
        <div class="add-row">
          <input id="pullups-input" type="number" min="1" placeholder="How many?" />
          <button id="add-pullups" type="button">Add</button>
        </div>
      </div>
    </section>

    <div class="streak">
      <span>Current streak: <strong id="current-streak">0</strong></span>
      <span>Longest streak: <strong id="longest-streak">0</strong></span>
      <button id="reset-day" class="link" type="button">Reset today</button>
    </div>

    <div class="status" id="status"></div>

    <section>
      <h2>Leaderboard</h2>
      <div class="tabs" role="tablist">
        <button class="tab active" type="button" data-mode="daily" role="tab" aria-selected="true">Today</button>
        <button class="tab" type="button" data-mode="streak" role="tab" aria-selected="false">Streaks</button>
      </div>
      <table>
        <thead id="leaderboard-head"></thead>
        <tbody id="leaderboard-body"></tbody>
      </table>
    </section>
  </main>

  <script>
    const RADIUS = {{RING_RADIUS}};
    const CIRCUMFERENCE = 2 * Math.PI * RADIUS;
    const TOKEN_KEY = 'fit-tracker-token';

    let authMode = 'login';
    let leaderboardMode = 'daily';

    const $ = (id) => document.getElementById(id);
    const statusEl = $('status');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type;
    };

    const token = () => localStorage.getItem(TOKEN_KEY);

    const api = async (path, options = {}) => {
      const headers = { 'content-type': 'application/json' };
      if (token()) {
        headers.authorization = `Bearer ${token()}`;
      }
      const res = await fetch(path, { ...options, headers });
      if (res.status === 401 && path !== '/api/auth/sign-in') {
        localStorage.removeItem(TOKEN_KEY);
        showLogin();
      }
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.status === 204 ? null : res.json();
    };

    document.querySelectorAll('.ring').forEach((ring) => {
      ring.style.strokeDasharray = `${CIRCUMFERENCE} ${CIRCUMFERENCE}`;
      ring.style.strokeDashoffset = CIRCUMFERENCE;
    });

    const renderExercise = (type, view) => {
      $(`${type}-remaining`).textContent = view.remaining;
      $(`${type}-done`).textContent = view.done;
      const ring = document.querySelector(`.${type}-ring`);
      ring.style.strokeDashoffset = CIRCUMFERENCE - (view.percent / 100) * CIRCUMFERENCE;
    };

    const renderDashboard = (dashboard) => {
      $('nickname-label').textContent = dashboard.nickname;
      renderExercise('pushups', dashboard.pushups);
      renderExercise('pullups', dashboard.pullups);
      $('current-streak').textContent = dashboard.current_streak;
      $('longest-streak').textContent = dashboard.longest_streak;
    };

    const renderLeaderboard = (board) => {
      const head = $('leaderboard-head');
      const body = $('leaderboard-body');
      if (board.mode === 'daily') {
        head.innerHTML = '<tr><th>#</th><th>Nickname</th><th>Pushups</th><th>Pullups</th><th>Score</th></tr>';
      } else {
        head.innerHTML = '<tr><th>#</th><th>Nickname</th><th>Streak</th></tr>';
      }
      body.innerHTML = '';
      board.entries.forEach((entry, index) => {
        const row = document.createElement('tr');
        const cells = board.mode === 'daily'
          ? [index + 1, entry.nickname, entry.pushups, entry.pullups, entry.score]
          : [index + 1, entry.nickname, entry.score];
        cells.forEach((value) => {
          const cell = document.createElement('td');
          cell.textContent = value;
          row.appendChild(cell);
        });
        body.appendChild(row);
      });
    };

    const loadLeaderboard = async () => {
      renderLeaderboard(await api(`/api/leaderboard?mode=${leaderboardMode}`));
    };

    const showLogin = () => {
      $('login-overlay').classList.remove('hidden');
      $('main-content').classList.add('hidden');
    };

    const showApp = async () => {
      $('login-overlay').classList.add('hidden');
      $('main-content').classList.remove('hidden');
      $('email').value = '';
      $('password').value = '';
      $('confirm-password').value = '';
      $('auth-error').textContent = '';
      renderDashboard(await api('/api/today'));
      await loadLeaderboard();
    };

    const toggleAuthMode = () => {
      authMode = authMode === 'login' ? 'signup' : 'login';
      const isLogin = authMode === 'login';
      $('auth-title').textContent = isLogin ? 'Sign in' : 'Create an account';
      $('auth-subtitle').textContent = isLogin ? 'Welcome back!' : 'Join in!';
      $('auth-submit-btn').textContent = isLogin ? 'Sign in' : 'Sign up';
      $('auth-toggle-text').textContent = isLogin ? 'No account yet?' : 'Already have an account?';
      $('auth-toggle-btn').textContent = isLogin ? 'Sign up' : 'Sign in';
      ['nickname', 'confirm-password'].forEach((id) => {
        $(id).classList.toggle('hidden', isLogin);
        $(id).required = !isLogin;
      });
      $('auth-error').textContent = '';
    };

    $('auth-toggle-btn').addEventListener('click', toggleAuthMode);

    $('email-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      $('auth-error').textContent = '';
      const body = { email: $('email').value, password: $('password').value };
      let path = '/api/auth/sign-in';
      if (authMode === 'signup') {
        path = '/api/auth/sign-up';
        body.nickname = $('nickname').value;
        body.confirm_password = $('confirm-password').value;
      }
      try {
        const session = await api(path, { method: 'POST', body: JSON.stringify(body) });
        localStorage.setItem(TOKEN_KEY, session.token);
        await showApp();
      } catch (err) {
        $('auth-error').textContent = err.message;
      }
    });

    $('logout-btn').addEventListener('click', async () => {
      try {
        await api('/api/auth/sign-out', { method: 'POST' });
      } catch (err) {
        console.error(err);
      }
      localStorage.removeItem(TOKEN_KEY);
      showLogin();
    });

    const addProgress = async (exercise) => {
      const input = $(`${exercise}-input`);
      try {
        const dashboard = await api('/api/progress', {
          method: 'POST',
          body: JSON.stringify({ exercise, amount: input.value })
        });
        renderDashboard(dashboard);
        input.value = '';
        input.focus();
        setStatus('Saved', 'ok');
        loadLeaderboard().catch((err) => console.error(err));
      } catch (err) {
        setStatus(err.message, 'error');
      }
    };

    ['pushups', 'pullups'].forEach((exercise) => {
      $(`add-${exercise}`).addEventListener('click', () => addProgress(exercise));
      $(`${exercise}-input`).addEventListener('keypress', (event) => {
        if (event.key === 'Enter') {
          addProgress(exercise);
        }
      });
    });

    $('reset-day').addEventListener('click', async () => {
      if (!confirm('Reset today\'s progress?')) {
        return;
      }
      try {
        renderDashboard(await api('/api/reset', { method: 'POST' }));
        loadLeaderboard().catch((err) => console.error(err));
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    document.querySelectorAll('.tab').forEach((button) => {
      button.addEventListener('click', () => {
        leaderboardMode = button.dataset.mode;
        document.querySelectorAll('.tab').forEach((tab) => {
          const isActive = tab === button;
          tab.classList.toggle('active', isActive);
          tab.setAttribute('aria-selected', String(isActive));
        });
        loadLeaderboard().catch((err) => setStatus(err.message, 'error'));
      });
    });

    if (token()) {
      showApp().catch(() => showLogin());
    } else {
      showLogin();
    }
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_in_goals_and_date() {
        let day = CalendarDay::from_ymd(2026, 1, 5).unwrap();
        let html = render_index(&day, &Goals { pushups: 80, pullups: 40 });
        assert!(html.contains("Done <span id=\"pushups-done\">0</span> / 80"));
        assert!(html.contains("/ 40"));
        assert!(html.contains("Monday"));
        assert!(html.contains("const RADIUS = 52;"));
        assert!(!html.contains("{{"));
    }
}
